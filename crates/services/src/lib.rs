#![forbid(unsafe_code)]

pub mod audio;
pub mod flow;
pub mod history;
pub mod ticker;
pub mod wizard;

pub use worry_core::{Clock, ExampleWorry};

pub use audio::{AmbientAudio, AudioError, AudioPlayer, NullAudioPlayer};
pub use flow::WizardFlow;
pub use history::{HistoryService, HistorySummary, TrendPoint};
pub use ticker::SessionTicker;
pub use wizard::{Stage, Wizard, WizardSnapshot};

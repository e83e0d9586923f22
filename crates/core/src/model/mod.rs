mod rating;
mod session;
mod user;

pub use rating::{AnxietyRating, RatingError};
pub use session::{Session, SessionDraft, SessionDraftError, SessionError};
pub use user::{DEFAULT_USER_NAME, User};

pub mod athlete;
pub mod category;
pub mod event;
pub mod event_type;
pub mod organization;
pub mod result_entry;

pub use athlete::{Athlete, AthleteRef};
pub use category::Category;
pub use event::Event;
pub use event_type::EventType;
pub use organization::Organization;
pub use result_entry::ResultEntry;

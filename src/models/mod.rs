pub mod alert;
pub mod enums;
pub mod session;
pub mod vital_sign;

pub use alert::Alert;
pub use enums::{AlertSeverity, Scenario};
pub use session::{GeoLocation, SessionInfo};
pub use vital_sign::{VitalType, VitalsSample};

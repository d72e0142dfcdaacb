//! Seoul Open Data Plaza tools.
//!
//! - `subway_status`: subway boarding/alighting counts per station
//! - `cultural_event`: cultural event listings from the Seoul Culture Portal
//!
//! Both share the request and response checks in `client`.

pub mod client;
pub mod cultural_event;
pub mod subway_status;

pub use client::SeoulApiClient;
pub use cultural_event::{CulturalEventParams, CulturalEventTool};
pub use subway_status::{SubwayStatusParams, SubwayStatusQuery, SubwayStatusTool};

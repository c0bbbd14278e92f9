pub mod client;
pub mod form;
pub mod normalizer;
pub mod resources;
pub mod transport;

pub use crate::domain::model::{
    BirthDateRange, Branch, Club, ClubDraft, ClubMemberCount, Envelope, Member, MemberDraft,
};
pub use crate::domain::ports::{
    ApiRequest, ConfigProvider, HttpMethod, Storage, Transport, TransportOutcome,
};
pub use crate::utils::error::Result;

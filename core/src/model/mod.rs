pub mod document;
pub mod house;
pub mod record;

pub use document::{DocumentError, DocumentResult};
pub use house::{Floor, FloorId, House, Room, RoomId, UNTITLED_HOUSE};
pub use record::{AccessPointRecord, ChannelValue};

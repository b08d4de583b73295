mod canvas;
mod font;
mod packet;
pub mod pages;

pub use canvas::{PAGE_HEIGHT, PAGE_WIDTH, PageCanvas, Rgb};
pub use font::{CoreFont, FontResources};
pub use packet::{FinalizedPacket, MergedPacket, PacketMeta};

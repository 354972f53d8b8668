pub mod dispatcher;
pub mod types;

pub use dispatcher::{ListenerHandle, PointerDispatcher};
pub use types::{
    PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerSource,
};

pub mod prelude {
    pub use super::types::{
        PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerSource,
    };
}

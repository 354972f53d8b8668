//! Element tree, pointer input plumbing and the drag engine for Glide.
//!
//! | Module | Role |
//! |--------|------|
//! | [`element`] | Element tree with bounds, classes and hit testing |
//! | [`selector`] | Tag/class/id selectors used by ignore regions |
//! | [`input`] | Pointer event types and the listener dispatcher |
//! | [`document`] | Host-facing handle tying tree, dispatcher, drag bus and frame clock together |
//! | [`broadcast`] | Publish-subscribe bus for drag notifications |
//! | [`gestures`] | The drag engine ([`Draggable`]) and its session geometry |

pub mod broadcast;
pub mod document;
pub mod element;
pub mod gestures;
pub mod input;
pub mod selector;

pub use broadcast::{DragBroadcast, DragNotice, Subscription};
pub use document::Document;
pub use element::{ElementData, ElementId, ElementTree, TreeError};
pub use gestures::{
    DragGeometry, Draggable, DraggableOptions, ElementRef, IgnoreRegion, Position,
};
pub use input::{
    ListenerHandle, PointerButton, PointerButtons, PointerDispatcher, PointerEvent,
    PointerEventKind, PointerSource,
};
pub use selector::{Selector, SelectorError};

pub mod prelude {
    pub use crate::document::Document;
    pub use crate::element::ElementId;
    pub use crate::gestures::{Draggable, DraggableOptions, IgnoreRegion, Position};
    pub use crate::input::{PointerEvent, PointerEventKind, PointerSource};
}

//! Custom TUI widgets.

pub mod command_popup;
pub mod message_list;
pub mod sidebar;

pub use command_popup::{CommandMatch, CommandPopup, CommandPopupState, MAX_COMMAND_POPUP_ROWS};
pub use message_list::{
    MessageListWidget, MessageRow, TermHighlight, row_extents, row_height, total_height,
};
pub use sidebar::SidebarWidget;

mod layout;
mod widgets;

pub use layout::render;
pub use widgets::{
    render_delete_confirmation,
    render_header,
    render_help_screen,
    render_note_detail,
    render_note_list,
    render_search_overlay,
    render_status_bar,
    render_toasts,
};

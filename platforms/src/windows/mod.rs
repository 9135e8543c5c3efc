mod bitmap;
mod dialog;
mod error;
mod string;

pub use {
    bitmap::bgra_to_bmp,
    dialog::{
        TaskDialogButton, TaskDialogButtons, TaskDialogConfig, TaskDialogFlags, TaskDialogIcon,
        TaskDialogResult, show, show_indirect, show_indirect_async,
    },
    error::Error,
};

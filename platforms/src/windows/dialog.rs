//! Task dialog wrapper.
//!
//! Both forms block the calling thread until the user dismisses the native
//! dialog; there is no cancellation or timeout. The embedding application
//! must provide a common-controls v6 activation context through its
//! manifest for the native calls to succeed.

use std::ptr;

use bitflags::bitflags;
use windows::Win32::Foundation::HINSTANCE;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Controls::{
    TASKDIALOG_BUTTON, TASKDIALOG_COMMON_BUTTON_FLAGS, TASKDIALOG_FLAGS, TASKDIALOGCONFIG,
    TASKDIALOGCONFIG_0, TASKDIALOGCONFIG_1, TD_ERROR_ICON, TD_INFORMATION_ICON, TD_SHIELD_ICON,
    TD_WARNING_ICON, TDCBF_CANCEL_BUTTON, TDCBF_CLOSE_BUTTON, TDCBF_NO_BUTTON, TDCBF_OK_BUTTON,
    TDCBF_RETRY_BUTTON, TDCBF_YES_BUTTON, TDF_ALLOW_DIALOG_CANCELLATION, TDF_CALLBACK_TIMER,
    TDF_CAN_BE_MINIMIZED, TDF_ENABLE_HYPERLINKS, TDF_EXPAND_FOOTER_AREA, TDF_EXPANDED_BY_DEFAULT,
    TDF_NO_DEFAULT_RADIO_BUTTON, TDF_POSITION_RELATIVE_TO_WINDOW, TDF_RTL_LAYOUT,
    TDF_SHOW_MARQUEE_PROGRESS_BAR, TDF_SHOW_PROGRESS_BAR, TDF_USE_COMMAND_LINKS,
    TDF_USE_COMMAND_LINKS_NO_ICON, TDF_USE_HICON_FOOTER, TDF_USE_HICON_MAIN,
    TDF_VERIFICATION_FLAG_CHECKED, TaskDialog, TaskDialogIndirect,
};
use windows::Win32::UI::WindowsAndMessaging::{
    IDCANCEL, IDNO, IDOK, IDRETRY, IDYES, MESSAGEBOX_RESULT,
};
use windows::core::PCWSTR;

use super::error::Error;
use super::string::to_wide;

bitflags! {
    /// Common button set of a task dialog.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TaskDialogButtons: i32 {
        const OK = TDCBF_OK_BUTTON.0;
        const YES = TDCBF_YES_BUTTON.0;
        const NO = TDCBF_NO_BUTTON.0;
        const CANCEL = TDCBF_CANCEL_BUTTON.0;
        const RETRY = TDCBF_RETRY_BUTTON.0;
        const CLOSE = TDCBF_CLOSE_BUTTON.0;
    }
}

bitflags! {
    /// Behavioral flag bitmask of [`TaskDialogConfig`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TaskDialogFlags: i32 {
        const ENABLE_HYPERLINKS = TDF_ENABLE_HYPERLINKS.0;
        const USE_HICON_MAIN = TDF_USE_HICON_MAIN.0;
        const USE_HICON_FOOTER = TDF_USE_HICON_FOOTER.0;
        const ALLOW_DIALOG_CANCELLATION = TDF_ALLOW_DIALOG_CANCELLATION.0;
        const USE_COMMAND_LINKS = TDF_USE_COMMAND_LINKS.0;
        const USE_COMMAND_LINKS_NO_ICON = TDF_USE_COMMAND_LINKS_NO_ICON.0;
        const EXPAND_FOOTER_AREA = TDF_EXPAND_FOOTER_AREA.0;
        const EXPANDED_BY_DEFAULT = TDF_EXPANDED_BY_DEFAULT.0;
        const VERIFICATION_FLAG_CHECKED = TDF_VERIFICATION_FLAG_CHECKED.0;
        const SHOW_PROGRESS_BAR = TDF_SHOW_PROGRESS_BAR.0;
        const SHOW_MARQUEE_PROGRESS_BAR = TDF_SHOW_MARQUEE_PROGRESS_BAR.0;
        const CALLBACK_TIMER = TDF_CALLBACK_TIMER.0;
        const POSITION_RELATIVE_TO_WINDOW = TDF_POSITION_RELATIVE_TO_WINDOW.0;
        const RTL_LAYOUT = TDF_RTL_LAYOUT.0;
        const NO_DEFAULT_RADIO_BUTTON = TDF_NO_DEFAULT_RADIO_BUTTON.0;
        const CAN_BE_MINIMIZED = TDF_CAN_BE_MINIMIZED.0;
    }
}

/// Icon shown in the main or footer area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskDialogIcon {
    #[default]
    None,
    Warning,
    Error,
    Information,
    Shield,
}

/// The button the user activated.
///
/// Ids outside the closed common set, custom buttons included, surface as
/// [`TaskDialogResult::Custom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskDialogResult {
    Ok,
    Cancel,
    Yes,
    No,
    Retry,
    Custom(i32),
}

/// A caller-defined button.
#[derive(Clone, Debug)]
pub struct TaskDialogButton {
    pub id: i32,
    pub text: String,
}

/// Configuration of the indirect dialog form.
///
/// Absent text fields marshal as null and leave the corresponding dialog
/// area out.
#[derive(Clone, Debug, Default)]
pub struct TaskDialogConfig {
    pub flags: TaskDialogFlags,
    pub common_buttons: TaskDialogButtons,
    pub window_title: Option<String>,
    pub main_icon: TaskDialogIcon,
    pub main_instruction: Option<String>,
    pub content: Option<String>,
    pub buttons: Vec<TaskDialogButton>,
    pub verification_text: Option<String>,
    pub expanded_information: Option<String>,
    pub expanded_control_text: Option<String>,
    pub collapsed_control_text: Option<String>,
    pub footer_icon: TaskDialogIcon,
    pub footer: Option<String>,
}

/// Shows the simple dialog form and blocks until the user dismisses it.
///
/// The owner window is null and the instance handle is resolved from the
/// running module.
pub fn show(
    window_title: &str,
    main_instruction: &str,
    content: &str,
    buttons: TaskDialogButtons,
    icon: TaskDialogIcon,
) -> Result<TaskDialogResult, Error> {
    let window_title = to_wide(window_title).ok_or(Error::InvalidText)?;
    let main_instruction = to_wide(main_instruction).ok_or(Error::InvalidText)?;
    let content = to_wide(content).ok_or(Error::InvalidText)?;
    let instance = module_instance()?;
    let mut button = 0;
    unsafe {
        TaskDialog(
            None,
            Some(instance),
            PCWSTR(window_title.as_ptr()),
            PCWSTR(main_instruction.as_ptr()),
            PCWSTR(content.as_ptr()),
            TASKDIALOG_COMMON_BUTTON_FLAGS(buttons.bits()),
            to_icon(icon),
            Some(&raw mut button),
        )?;
    }
    Ok(to_result(button))
}

/// Shows the configurable dialog form and blocks until the user dismisses
/// it.
pub fn show_indirect(config: &TaskDialogConfig) -> Result<TaskDialogResult, Error> {
    let window_title = marshal(config.window_title.as_deref())?;
    let main_instruction = marshal(config.main_instruction.as_deref())?;
    let content = marshal(config.content.as_deref())?;
    let verification_text = marshal(config.verification_text.as_deref())?;
    let expanded_information = marshal(config.expanded_information.as_deref())?;
    let expanded_control_text = marshal(config.expanded_control_text.as_deref())?;
    let collapsed_control_text = marshal(config.collapsed_control_text.as_deref())?;
    let footer = marshal(config.footer.as_deref())?;

    // the text buffers above and below must outlive the native call
    let button_texts = config
        .buttons
        .iter()
        .map(|button| to_wide(&button.text).ok_or(Error::InvalidText))
        .collect::<Result<Vec<_>, _>>()?;
    let native_buttons = config
        .buttons
        .iter()
        .zip(&button_texts)
        .map(|(button, text)| TASKDIALOG_BUTTON {
            nButtonID: button.id,
            pszButtonText: PCWSTR(text.as_ptr()),
        })
        .collect::<Vec<_>>();

    let native = TASKDIALOGCONFIG {
        cbSize: size_of::<TASKDIALOGCONFIG>() as u32,
        hInstance: module_instance()?,
        dwFlags: TASKDIALOG_FLAGS(config.flags.bits()),
        dwCommonButtons: TASKDIALOG_COMMON_BUTTON_FLAGS(config.common_buttons.bits()),
        pszWindowTitle: as_pcwstr(&window_title),
        Anonymous1: TASKDIALOGCONFIG_0 {
            pszMainIcon: to_icon(config.main_icon),
        },
        pszMainInstruction: as_pcwstr(&main_instruction),
        pszContent: as_pcwstr(&content),
        cButtons: native_buttons.len() as u32,
        pButtons: if native_buttons.is_empty() {
            ptr::null()
        } else {
            native_buttons.as_ptr()
        },
        pszVerificationText: as_pcwstr(&verification_text),
        pszExpandedInformation: as_pcwstr(&expanded_information),
        pszExpandedControlText: as_pcwstr(&expanded_control_text),
        pszCollapsedControlText: as_pcwstr(&collapsed_control_text),
        Anonymous2: TASKDIALOGCONFIG_1 {
            pszFooterIcon: to_icon(config.footer_icon),
        },
        pszFooter: as_pcwstr(&footer),
        ..TASKDIALOGCONFIG::default()
    };

    let mut button = 0;
    unsafe { TaskDialogIndirect(&native, Some(&raw mut button), None, None) }?;
    Ok(to_result(button))
}

/// Suspends the calling task until the user dismisses the dialog.
///
/// The native call runs on a blocking thread and is not cancellable once
/// invoked; dropping the future does not dismiss the dialog.
pub async fn show_indirect_async(config: TaskDialogConfig) -> Result<TaskDialogResult, Error> {
    tokio::task::spawn_blocking(move || show_indirect(&config))
        .await
        .expect("blocking dialog task panicked")
}

fn module_instance() -> Result<HINSTANCE, Error> {
    let module = unsafe { GetModuleHandleW(None) }?;
    Ok(HINSTANCE(module.0))
}

fn marshal(text: Option<&str>) -> Result<Option<Vec<u16>>, Error> {
    match text {
        Some(text) => to_wide(text).map(Some).ok_or(Error::InvalidText),
        None => Ok(None),
    }
}

#[inline]
fn as_pcwstr(text: &Option<Vec<u16>>) -> PCWSTR {
    text.as_ref()
        .map(|text| PCWSTR(text.as_ptr()))
        .unwrap_or(PCWSTR::null())
}

#[inline]
fn to_icon(icon: TaskDialogIcon) -> PCWSTR {
    match icon {
        TaskDialogIcon::None => PCWSTR::null(),
        TaskDialogIcon::Warning => TD_WARNING_ICON,
        TaskDialogIcon::Error => TD_ERROR_ICON,
        TaskDialogIcon::Information => TD_INFORMATION_ICON,
        TaskDialogIcon::Shield => TD_SHIELD_ICON,
    }
}

#[inline]
fn to_result(button: i32) -> TaskDialogResult {
    match MESSAGEBOX_RESULT(button) {
        IDOK => TaskDialogResult::Ok,
        IDCANCEL => TaskDialogResult::Cancel,
        IDYES => TaskDialogResult::Yes,
        IDNO => TaskDialogResult::No,
        IDRETRY => TaskDialogResult::Retry,
        _ => TaskDialogResult::Custom(button),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_button_bits_match_native_flags() {
        assert_eq!(TaskDialogButtons::OK.bits(), TDCBF_OK_BUTTON.0);
        assert_eq!(TaskDialogButtons::YES.bits(), TDCBF_YES_BUTTON.0);
        assert_eq!(TaskDialogButtons::NO.bits(), TDCBF_NO_BUTTON.0);
        assert_eq!(TaskDialogButtons::CANCEL.bits(), TDCBF_CANCEL_BUTTON.0);
        assert_eq!(TaskDialogButtons::RETRY.bits(), TDCBF_RETRY_BUTTON.0);
        assert_eq!(TaskDialogButtons::CLOSE.bits(), TDCBF_CLOSE_BUTTON.0);
        assert_eq!(
            (TaskDialogButtons::OK | TaskDialogButtons::CANCEL).bits(),
            TDCBF_OK_BUTTON.0 | TDCBF_CANCEL_BUTTON.0
        );
    }

    #[test]
    fn flag_bits_match_native_flags() {
        assert_eq!(
            TaskDialogFlags::ENABLE_HYPERLINKS.bits(),
            TDF_ENABLE_HYPERLINKS.0
        );
        assert_eq!(
            TaskDialogFlags::VERIFICATION_FLAG_CHECKED.bits(),
            TDF_VERIFICATION_FLAG_CHECKED.0
        );
        assert_eq!(
            TaskDialogFlags::CAN_BE_MINIMIZED.bits(),
            TDF_CAN_BE_MINIMIZED.0
        );
        assert_eq!(TaskDialogFlags::all().bits(), 0xFFFF);
    }

    #[test]
    fn ok_activation_maps_to_ok() {
        assert_eq!(to_result(IDOK.0), TaskDialogResult::Ok);
    }

    #[test]
    fn dismissals_map_to_the_closed_set() {
        assert_eq!(to_result(IDCANCEL.0), TaskDialogResult::Cancel);
        assert_eq!(to_result(IDYES.0), TaskDialogResult::Yes);
        assert_eq!(to_result(IDNO.0), TaskDialogResult::No);
        assert_eq!(to_result(IDRETRY.0), TaskDialogResult::Retry);
    }

    #[test]
    fn custom_ids_pass_through() {
        assert_eq!(to_result(101), TaskDialogResult::Custom(101));
        // IDCLOSE sits outside the closed result set
        assert_eq!(to_result(8), TaskDialogResult::Custom(8));
    }

    #[test]
    fn icons_map_to_resource_ids() {
        assert!(to_icon(TaskDialogIcon::None).is_null());
        assert_eq!(to_icon(TaskDialogIcon::Warning).0, TD_WARNING_ICON.0);
        assert_eq!(to_icon(TaskDialogIcon::Error).0, TD_ERROR_ICON.0);
        assert_eq!(to_icon(TaskDialogIcon::Information).0, TD_INFORMATION_ICON.0);
        assert_eq!(to_icon(TaskDialogIcon::Shield).0, TD_SHIELD_ICON.0);
    }

    #[test]
    fn interior_nul_is_a_config_error() {
        let config = TaskDialogConfig {
            window_title: Some("bad\0title".into()),
            ..TaskDialogConfig::default()
        };
        assert_eq!(show_indirect(&config).unwrap_err(), Error::InvalidText);
    }
}

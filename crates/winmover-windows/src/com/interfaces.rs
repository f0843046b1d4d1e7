// COM interface definitions for the Windows ImmersiveShell.
//
// These undocumented interfaces expose the virtual desktop manager that
// Explorer uses internally. The vtable layouts are defined manually to
// avoid an external proc-macro dependency, and match the Windows 10
// builds of the shell. Later builds change the internal IIDs.

use std::ffi::c_void;

use windows::Win32::Foundation::{HWND, RECT};
use windows::core::{GUID, HRESULT, IUnknown_Vtbl, PCWSTR, PWSTR};

#[allow(non_upper_case_globals)]
pub const CLSID_ImmersiveShell: GUID = GUID::from_u128(0xC2F03A33_21F5_47FA_B4BB_156362A2F239);

#[allow(non_upper_case_globals)]
pub const CLSID_VirtualDesktopManagerInternal: GUID =
    GUID::from_u128(0xC5E0CDCA_7B6E_41B2_9FC4_D93975CC467B);

#[allow(non_upper_case_globals)]
pub const CLSID_VirtualDesktopManager: GUID =
    GUID::from_u128(0xAA509086_5CA9_4C25_8F95_589D3C07B48A);

#[allow(non_upper_case_globals)]
pub const CLSID_VirtualDesktopPinnedApps: GUID =
    GUID::from_u128(0xB5A399E7_1C87_46B8_88E9_FC5747B171BD);

pub const IID_SERVICE_PROVIDER: GUID = GUID::from_u128(0x6D5140C1_7436_11CE_8034_00AA006009FA);

pub const IID_VIEW_COLLECTION: GUID = GUID::from_u128(0x1841C6D7_4F9D_42C0_AF41_8747538F10E5);

pub const IID_DESKTOP_MANAGER_INTERNAL: GUID =
    GUID::from_u128(0xF31574D6_B682_4CDC_BD56_1827860ABEC6);

pub const IID_VIRTUAL_DESKTOP: GUID = GUID::from_u128(0xFF72FFDD_BE7E_43FC_9C03_AD81681E88E4);

pub const IID_DESKTOP_MANAGER: GUID = GUID::from_u128(0xA5CD92FF_29BE_454C_8D04_D82879FB3F1B);

pub const IID_PINNED_APPS: GUID = GUID::from_u128(0x4CE81583_1E4C_4632_A621_07A53543148F);

// IServiceProvider {6D5140C1-7436-11CE-8034-00AA006009FA}
#[repr(C)]
pub struct IServiceProviderVtbl {
    pub base: IUnknown_Vtbl,
    pub query_service: unsafe extern "system" fn(
        this: *mut c_void,
        guid_service: *const GUID,
        riid: *const GUID,
        ppv_object: *mut *mut c_void,
    ) -> HRESULT,
}

// IObjectArray {92CA9DCD-5622-4BBA-A805-5E9F541BD8C9}
#[repr(C)]
pub struct IObjectArrayVtbl {
    pub base: IUnknown_Vtbl,
    pub get_count: unsafe extern "system" fn(this: *mut c_void, out: *mut u32) -> HRESULT,
    pub get_at: unsafe extern "system" fn(
        this: *mut c_void,
        index: u32,
        riid: *const GUID,
        out: *mut *mut c_void,
    ) -> HRESULT,
}

// IApplicationViewCollection {1841C6D7-4F9D-42C0-AF41-8747538F10E5}
#[repr(C)]
pub struct IApplicationViewCollectionVtbl {
    pub base: IUnknown_Vtbl,
    pub get_views: unsafe extern "system" fn(this: *mut c_void, out: *mut c_void) -> HRESULT,
    pub get_views_by_zorder:
        unsafe extern "system" fn(this: *mut c_void, out: *mut c_void) -> HRESULT,
    pub get_views_by_app_user_model_id:
        unsafe extern "system" fn(this: *mut c_void, id: *mut c_void, out: *mut c_void) -> HRESULT,
    pub get_view_for_hwnd: unsafe extern "system" fn(
        this: *mut c_void,
        window: HWND,
        out_view: *mut *mut c_void,
    ) -> HRESULT,
}

// IApplicationView {372E1D3B-38D3-42E4-A15B-8AB2B178F513}
//
// Declared up to `get_app_user_model_id`. Later vtable entries are not
// needed and omitting them is safe for COM call dispatch.
#[repr(C)]
pub struct IApplicationViewVtbl {
    pub base: IUnknown_Vtbl,
    // IInspectable (3 methods)
    pub get_iids: unsafe extern "system" fn(
        this: *mut c_void,
        out_count: *mut u32,
        out: *mut *mut GUID,
    ) -> HRESULT,
    pub get_runtime_class_name:
        unsafe extern "system" fn(this: *mut c_void, out: *mut c_void) -> HRESULT,
    pub get_trust_level: unsafe extern "system" fn(this: *mut c_void, out: *mut c_void) -> HRESULT,
    // IApplicationView
    pub set_focus: unsafe extern "system" fn(this: *mut c_void) -> HRESULT,
    pub switch_to: unsafe extern "system" fn(this: *mut c_void) -> HRESULT,
    pub try_invoke_back: unsafe extern "system" fn(this: *mut c_void, cb: u32) -> HRESULT,
    pub get_thumbnail_window:
        unsafe extern "system" fn(this: *mut c_void, out: *mut HWND) -> HRESULT,
    pub get_monitor: unsafe extern "system" fn(this: *mut c_void, out: *mut *mut u32) -> HRESULT,
    pub get_visibility: unsafe extern "system" fn(this: *mut c_void, out: *mut c_void) -> HRESULT,
    pub set_cloak:
        unsafe extern "system" fn(this: *mut c_void, cloak_type: u32, flags: i32) -> HRESULT,
    pub get_position: unsafe extern "system" fn(
        this: *mut c_void,
        riid: *const GUID,
        out: *mut *mut c_void,
    ) -> HRESULT,
    pub set_position: unsafe extern "system" fn(this: *mut c_void, pos: *mut c_void) -> HRESULT,
    pub insert_after_window: unsafe extern "system" fn(this: *mut c_void, hwnd: HWND) -> HRESULT,
    pub get_extended_frame_position:
        unsafe extern "system" fn(this: *mut c_void, out: *mut RECT) -> HRESULT,
    pub get_app_user_model_id:
        unsafe extern "system" fn(this: *mut c_void, out: *mut PWSTR) -> HRESULT,
}

// IVirtualDesktop {FF72FFDD-BE7E-43FC-9C03-AD81681E88E4}
#[repr(C)]
pub struct IVirtualDesktopVtbl {
    pub base: IUnknown_Vtbl,
    pub is_view_visible:
        unsafe extern "system" fn(this: *mut c_void, view: *mut c_void, out: *mut i32) -> HRESULT,
    pub get_id: unsafe extern "system" fn(this: *mut c_void, out: *mut GUID) -> HRESULT,
}

// IVirtualDesktopManagerInternal {F31574D6-B682-4CDC-BD56-1827860ABEC6}
#[repr(C)]
pub struct IVirtualDesktopManagerInternalVtbl {
    pub base: IUnknown_Vtbl,
    pub get_count: unsafe extern "system" fn(this: *mut c_void, out: *mut i32) -> HRESULT,
    pub move_view_to_desktop: unsafe extern "system" fn(
        this: *mut c_void,
        view: *mut c_void,
        desktop: *mut c_void,
    ) -> HRESULT,
    pub can_view_move_desktops:
        unsafe extern "system" fn(this: *mut c_void, view: *mut c_void, out: *mut i32) -> HRESULT,
    pub get_current_desktop:
        unsafe extern "system" fn(this: *mut c_void, out: *mut *mut c_void) -> HRESULT,
    pub get_desktops:
        unsafe extern "system" fn(this: *mut c_void, out: *mut *mut c_void) -> HRESULT,
    pub get_adjacent_desktop: unsafe extern "system" fn(
        this: *mut c_void,
        from: *mut c_void,
        direction: u32,
        out: *mut *mut c_void,
    ) -> HRESULT,
    pub switch_desktop:
        unsafe extern "system" fn(this: *mut c_void, desktop: *mut c_void) -> HRESULT,
    pub create_desktop:
        unsafe extern "system" fn(this: *mut c_void, out: *mut *mut c_void) -> HRESULT,
    pub remove_desktop: unsafe extern "system" fn(
        this: *mut c_void,
        desktop: *mut c_void,
        fallback: *mut c_void,
    ) -> HRESULT,
    pub find_desktop: unsafe extern "system" fn(
        this: *mut c_void,
        id: *const GUID,
        out: *mut *mut c_void,
    ) -> HRESULT,
}

// IVirtualDesktopManager {A5CD92FF-29BE-454C-8D04-D82879FB3F1B}
//
// The documented interface; it can only move windows owned by the
// calling process.
#[repr(C)]
pub struct IVirtualDesktopManagerVtbl {
    pub base: IUnknown_Vtbl,
    pub is_window_on_current_virtual_desktop:
        unsafe extern "system" fn(this: *mut c_void, hwnd: HWND, out: *mut i32) -> HRESULT,
    pub get_window_desktop_id:
        unsafe extern "system" fn(this: *mut c_void, hwnd: HWND, out: *mut GUID) -> HRESULT,
    pub move_window_to_desktop:
        unsafe extern "system" fn(this: *mut c_void, hwnd: HWND, id: *const GUID) -> HRESULT,
}

// IVirtualDesktopPinnedApps {4CE81583-1E4C-4632-A621-07A53543148F}
#[repr(C)]
pub struct IVirtualDesktopPinnedAppsVtbl {
    pub base: IUnknown_Vtbl,
    pub is_app_id_pinned:
        unsafe extern "system" fn(this: *mut c_void, app_id: PCWSTR, out: *mut i32) -> HRESULT,
    pub pin_app_id: unsafe extern "system" fn(this: *mut c_void, app_id: PCWSTR) -> HRESULT,
    pub unpin_app_id: unsafe extern "system" fn(this: *mut c_void, app_id: PCWSTR) -> HRESULT,
    pub is_view_pinned:
        unsafe extern "system" fn(this: *mut c_void, view: *mut c_void, out: *mut i32) -> HRESULT,
    pub pin_view: unsafe extern "system" fn(this: *mut c_void, view: *mut c_void) -> HRESULT,
    pub unpin_view: unsafe extern "system" fn(this: *mut c_void, view: *mut c_void) -> HRESULT,
}

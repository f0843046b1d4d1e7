//! Virtual desktop control via the ImmersiveShell.
//!
//! Windows has no public API to move another process's window between
//! virtual desktops or to pin it. Explorer's internal interfaces do
//! both; they are reached through the ImmersiveShell service provider.
//! Every call connects afresh, so a restarted Explorer is picked up.

mod interfaces;

use std::ffi::c_void;
use std::ptr;

use tracing::debug;
use windows::Win32::Foundation::{E_FAIL, HWND};
use windows::Win32::System::Com::{
    CLSCTX, CLSCTX_ALL, CLSCTX_LOCAL_SERVER, COINIT_APARTMENTTHREADED, CoCreateInstance,
    CoInitializeEx, CoTaskMemFree, CoUninitialize,
};
use windows::core::{GUID, HRESULT, IUnknown, IUnknown_Vtbl, Interface, PCWSTR, PWSTR};
use winmover_core::{InteropError, VirtualDesktopBackend, WindowHandle, WindowResult};

use interfaces::{
    CLSID_ImmersiveShell, CLSID_VirtualDesktopManager, CLSID_VirtualDesktopManagerInternal,
    CLSID_VirtualDesktopPinnedApps, IApplicationViewCollectionVtbl, IApplicationViewVtbl,
    IID_DESKTOP_MANAGER, IID_DESKTOP_MANAGER_INTERNAL, IID_PINNED_APPS, IID_SERVICE_PROVIDER,
    IID_VIEW_COLLECTION, IID_VIRTUAL_DESKTOP, IObjectArrayVtbl, IServiceProviderVtbl,
    IVirtualDesktopManagerInternalVtbl, IVirtualDesktopManagerVtbl, IVirtualDesktopPinnedAppsVtbl,
    IVirtualDesktopVtbl,
};

use crate::{process, registry, window};

/// Ensures COM is initialized on the calling thread.
struct ComInit;

impl ComInit {
    fn new() -> Self {
        // SAFETY: CoInitializeEx is safe to call; duplicate calls on the
        // same thread return S_FALSE and are harmless.
        unsafe {
            let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
        }
        Self
    }
}

impl Drop for ComInit {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}

thread_local! {
    static COM_INIT: ComInit = ComInit::new();
}

/// One owned reference to a raw COM object, released on drop.
struct ComPtr(*mut c_void);

impl ComPtr {
    fn as_raw(&self) -> *mut c_void {
        self.0
    }

    /// Reinterprets the object's vtable.
    ///
    /// # Safety
    /// `T` must be the vtable layout of the interface this pointer was
    /// obtained for.
    unsafe fn vtbl<T>(&self) -> &T {
        unsafe { &*(*(self.0 as *const *const T)) }
    }
}

impl Drop for ComPtr {
    fn drop(&mut self) {
        // SAFETY: ComPtr is only built from non-null pointers that carry
        // a reference we own.
        unsafe {
            let vtbl = &*(*(self.0 as *const *const IUnknown_Vtbl));
            (vtbl.Release)(self.0);
        }
    }
}

fn check(hr: HRESULT, step: &'static str) -> WindowResult<()> {
    if hr.is_err() {
        return Err(InteropError::Com {
            step,
            hresult: hr.0,
        });
    }
    Ok(())
}

/// Runs a call that returns an interface through an out pointer.
fn out_ptr(
    step: &'static str,
    call: impl FnOnce(*mut *mut c_void) -> HRESULT,
) -> WindowResult<ComPtr> {
    let mut out: *mut c_void = ptr::null_mut();
    check(call(&mut out), step)?;
    if out.is_null() {
        return Err(InteropError::Com { step, hresult: 0 });
    }
    Ok(ComPtr(out))
}

fn query_interface(object: *mut c_void, iid: &GUID, step: &'static str) -> WindowResult<ComPtr> {
    // SAFETY: object is a live COM pointer held by the caller.
    let vtbl = unsafe { &*(*(object as *const *const IUnknown_Vtbl)) };
    out_ptr(step, |out| unsafe { (vtbl.QueryInterface)(object, iid, out) })
}

fn create_instance(clsid: &GUID, context: CLSCTX, step: &'static str) -> WindowResult<IUnknown> {
    // SAFETY: plain object creation; COM is initialized on this thread.
    unsafe { CoCreateInstance(clsid, None, context) }.map_err(|e| InteropError::Com {
        step,
        hresult: e.code().0,
    })
}

/// A connection to the shell's service provider.
struct Shell {
    provider: ComPtr,
}

impl Shell {
    fn connect() -> WindowResult<Self> {
        let shell = create_instance(&CLSID_ImmersiveShell, CLSCTX_LOCAL_SERVER, "ImmersiveShell")?;
        let provider = query_interface(shell.as_raw(), &IID_SERVICE_PROVIDER, "IServiceProvider")?;
        Ok(Self { provider })
    }

    fn service(&self, sid: &GUID, iid: &GUID, step: &'static str) -> WindowResult<ComPtr> {
        // SAFETY: provider was obtained for IServiceProvider.
        let vtbl = unsafe { self.provider.vtbl::<IServiceProviderVtbl>() };
        out_ptr(step, |out| unsafe {
            (vtbl.query_service)(self.provider.as_raw(), sid, iid, out)
        })
    }

    fn manager(&self) -> WindowResult<ComPtr> {
        self.service(
            &CLSID_VirtualDesktopManagerInternal,
            &IID_DESKTOP_MANAGER_INTERNAL,
            "IVirtualDesktopManagerInternal",
        )
    }

    fn pinned_apps(&self) -> WindowResult<ComPtr> {
        self.service(
            &CLSID_VirtualDesktopPinnedApps,
            &IID_PINNED_APPS,
            "IVirtualDesktopPinnedApps",
        )
    }

    fn view_for(&self, hwnd: HWND) -> WindowResult<ComPtr> {
        let views = self.service(
            &IID_VIEW_COLLECTION,
            &IID_VIEW_COLLECTION,
            "IApplicationViewCollection",
        )?;
        // SAFETY: views was obtained for IApplicationViewCollection.
        let vtbl = unsafe { views.vtbl::<IApplicationViewCollectionVtbl>() };
        out_ptr("GetViewForHwnd", |out| unsafe {
            (vtbl.get_view_for_hwnd)(views.as_raw(), hwnd, out)
        })
    }

    fn desktop_count(&self) -> WindowResult<usize> {
        let manager = self.manager()?;
        // SAFETY: manager was obtained for IVirtualDesktopManagerInternal.
        let vtbl = unsafe { manager.vtbl::<IVirtualDesktopManagerInternalVtbl>() };
        let mut count = 0i32;
        check(
            unsafe { (vtbl.get_count)(manager.as_raw(), &mut count) },
            "GetCount",
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn desktops(&self) -> WindowResult<Vec<ComPtr>> {
        let manager = self.manager()?;
        // SAFETY: manager was obtained for IVirtualDesktopManagerInternal.
        let vtbl = unsafe { manager.vtbl::<IVirtualDesktopManagerInternalVtbl>() };
        let array = out_ptr("GetDesktops", |out| unsafe {
            (vtbl.get_desktops)(manager.as_raw(), out)
        })?;

        // SAFETY: GetDesktops returns an IObjectArray.
        let array_vtbl = unsafe { array.vtbl::<IObjectArrayVtbl>() };
        let mut count = 0u32;
        check(
            unsafe { (array_vtbl.get_count)(array.as_raw(), &mut count) },
            "IObjectArray::GetCount",
        )?;
        (0..count)
            .map(|i| {
                out_ptr("IObjectArray::GetAt", |out| unsafe {
                    (array_vtbl.get_at)(array.as_raw(), i, &IID_VIRTUAL_DESKTOP, out)
                })
            })
            .collect()
    }

    fn desktop_at(&self, index: usize) -> WindowResult<ComPtr> {
        let mut desktops = self.desktops()?;
        let count = desktops.len();
        if index >= count {
            return Err(InteropError::DesktopOutOfRange { index, count });
        }
        Ok(desktops.swap_remove(index))
    }

    fn move_view(&self, hwnd: HWND, desktop: &ComPtr) -> WindowResult<()> {
        let view = self.view_for(hwnd)?;
        let manager = self.manager()?;
        // SAFETY: manager was obtained for IVirtualDesktopManagerInternal.
        let vtbl = unsafe { manager.vtbl::<IVirtualDesktopManagerInternalVtbl>() };
        check(
            unsafe { (vtbl.move_view_to_desktop)(manager.as_raw(), view.as_raw(), desktop.as_raw()) },
            "MoveViewToDesktop",
        )
    }
}

fn desktop_id(desktop: &ComPtr) -> WindowResult<GUID> {
    // SAFETY: desktop was obtained for IVirtualDesktop.
    let vtbl = unsafe { desktop.vtbl::<IVirtualDesktopVtbl>() };
    let mut id = GUID::zeroed();
    check(
        unsafe { (vtbl.get_id)(desktop.as_raw(), &mut id) },
        "IVirtualDesktop::GetId",
    )?;
    Ok(id)
}

/// Moves a window owned by this process through the documented manager.
fn move_own_window(hwnd: HWND, desktop: &ComPtr) -> WindowResult<()> {
    let id = desktop_id(desktop)?;
    let unknown = create_instance(
        &CLSID_VirtualDesktopManager,
        CLSCTX_ALL,
        "VirtualDesktopManager",
    )?;
    let manager = query_interface(
        unknown.as_raw(),
        &IID_DESKTOP_MANAGER,
        "IVirtualDesktopManager",
    )?;
    // SAFETY: manager was obtained for IVirtualDesktopManager.
    let vtbl = unsafe { manager.vtbl::<IVirtualDesktopManagerVtbl>() };
    check(
        unsafe { (vtbl.move_window_to_desktop)(manager.as_raw(), hwnd, &id) },
        "MoveWindowToDesktop",
    )
}

/// Reads the application user model id of a view as a null-terminated buffer.
fn app_id(view: &ComPtr) -> WindowResult<Vec<u16>> {
    // SAFETY: view was obtained for IApplicationView.
    let vtbl = unsafe { view.vtbl::<IApplicationViewVtbl>() };
    let mut id = PWSTR::null();
    check(
        unsafe { (vtbl.get_app_user_model_id)(view.as_raw(), &mut id) },
        "GetAppUserModelId",
    )?;
    if id.is_null() {
        return Err(InteropError::Com {
            step: "GetAppUserModelId",
            hresult: 0,
        });
    }
    // SAFETY: the shell returns a CoTaskMemAlloc'd, null-terminated string
    // that we copy and then free.
    let wide = unsafe {
        let wide: Vec<u16> = id.as_wide().iter().copied().chain(Some(0)).collect();
        CoTaskMemFree(Some(id.0 as *const c_void));
        wide
    };
    Ok(wide)
}

fn with_shell<T>(call: impl FnOnce(&Shell) -> WindowResult<T>) -> WindowResult<T> {
    COM_INIT.with(|_| call(&Shell::connect()?))
}

/// [`VirtualDesktopBackend`] over Explorer's internal interfaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellDesktopBackend;

impl ShellDesktopBackend {
    fn pinned_query(
        &self,
        window: WindowHandle,
        query: impl FnOnce(&IVirtualDesktopPinnedAppsVtbl, *mut c_void, &ComPtr) -> HRESULT,
        step: &'static str,
    ) -> WindowResult<()> {
        with_shell(|shell| {
            let pinned = shell.pinned_apps()?;
            let view = shell.view_for(window::hwnd(window))?;
            // SAFETY: pinned was obtained for IVirtualDesktopPinnedApps.
            let vtbl = unsafe { pinned.vtbl::<IVirtualDesktopPinnedAppsVtbl>() };
            check(query(vtbl, pinned.as_raw(), &view), step)
        })
    }

    fn is_pinned(&self, window: WindowHandle, application: bool) -> WindowResult<bool> {
        let mut pinned = 0i32;
        self.pinned_query(
            window,
            |vtbl, this, view| unsafe {
                if application {
                    match app_id(view) {
                        Ok(id) => (vtbl.is_app_id_pinned)(this, PCWSTR(id.as_ptr()), &mut pinned),
                        Err(_) => E_FAIL,
                    }
                } else {
                    (vtbl.is_view_pinned)(this, view.as_raw(), &mut pinned)
                }
            },
            if application { "IsAppIdPinned" } else { "IsViewPinned" },
        )?;
        Ok(pinned != 0)
    }
}

impl VirtualDesktopBackend for ShellDesktopBackend {
    fn desktop_count(&self) -> WindowResult<usize> {
        with_shell(Shell::desktop_count)
    }

    fn desktop_name(&self, index: usize) -> WindowResult<Option<String>> {
        with_shell(|shell| {
            let desktop = shell.desktop_at(index)?;
            let id = desktop_id(&desktop)?;
            Ok(registry::desktop_name(&id))
        })
    }

    fn move_window(&self, window: WindowHandle, index: usize) -> WindowResult<()> {
        with_shell(|shell| {
            let desktop = shell.desktop_at(index)?;
            let hwnd = window::hwnd(window);
            let owner = window::window_process(window);

            if owner == Some(std::process::id()) {
                match move_own_window(hwnd, &desktop) {
                    Ok(()) => return Ok(()),
                    Err(e) => debug!("MoveWindowToDesktop failed for {window}: {e}"),
                }
                return shell.move_view(hwnd, &desktop);
            }

            match shell.move_view(hwnd, &desktop) {
                Ok(()) => Ok(()),
                Err(e) => {
                    // Some processes only expose a view for their main window.
                    let main = owner
                        .and_then(process::main_window)
                        .filter(|main| *main != window)
                        .ok_or(e)?;
                    debug!("retrying desktop move of {window} through main window {main}");
                    shell.move_view(window::hwnd(main), &desktop)
                }
            }
        })
    }

    fn is_window_pinned(&self, window: WindowHandle) -> WindowResult<bool> {
        self.is_pinned(window, false)
    }

    fn pin_window(&self, window: WindowHandle) -> WindowResult<()> {
        self.pinned_query(
            window,
            |vtbl, this, view| unsafe { (vtbl.pin_view)(this, view.as_raw()) },
            "PinView",
        )
    }

    fn unpin_window(&self, window: WindowHandle) -> WindowResult<()> {
        self.pinned_query(
            window,
            |vtbl, this, view| unsafe { (vtbl.unpin_view)(this, view.as_raw()) },
            "UnpinView",
        )
    }

    fn is_app_pinned(&self, window: WindowHandle) -> WindowResult<bool> {
        self.is_pinned(window, true)
    }

    fn pin_app(&self, window: WindowHandle) -> WindowResult<()> {
        self.pinned_query(
            window,
            |vtbl, this, view| unsafe {
                match app_id(view) {
                    Ok(id) => (vtbl.pin_app_id)(this, PCWSTR(id.as_ptr())),
                    Err(_) => E_FAIL,
                }
            },
            "PinAppID",
        )
    }

    fn unpin_app(&self, window: WindowHandle) -> WindowResult<()> {
        self.pinned_query(
            window,
            |vtbl, this, view| unsafe {
                match app_id(view) {
                    Ok(id) => (vtbl.unpin_app_id)(this, PCWSTR(id.as_ptr())),
                    Err(_) => E_FAIL,
                }
            },
            "UnpinAppID",
        )
    }
}

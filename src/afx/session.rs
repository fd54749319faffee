//! Live COM session against `afxw.obj`.
//!
//! COM here is strictly thread-affine: the thread that initializes the
//! apartment must make every call and tear it down. The session type is
//! `!Send`, so the compiler enforces that instead of a runtime check.

use std::marker::PhantomData;

use windows::core::{IUnknown, Interface, BSTR, GUID, PCWSTR};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL,
    COINIT_APARTMENTTHREADED, DISPATCH_METHOD, DISPPARAMS, IDispatch,
};
use windows::Win32::System::Variant::VARIANT;

use super::{collect_histories, excd_command, Afx, AfxError, Window};

const AFXW_PROG_ID: &str = "afxw.obj";

/// Locale handed to every dispatch call.
const LOCALE_SYSTEM_DEFAULT: u32 = 0x0800;

/// A single-threaded COM apartment entered on the current thread.
///
/// Entering pins the session to this thread for its whole life; the
/// `PhantomData<*mut ()>` marker keeps the guard (and anything owning it)
/// from moving to another thread. Dropping the guard uninitializes COM on
/// the thread that entered it.
struct ComApartment {
    _pinned: PhantomData<*mut ()>,
}

impl ComApartment {
    fn enter() -> Result<Self, AfxError> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .map_err(|e| AfxError::Initialize(e.message()))?;
        Ok(Self {
            _pinned: PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// An open session with a running AFxW instance.
///
/// Field order is the release order: the dispatch interface is released
/// first, then the root object, and the apartment is left last. A failure
/// partway through `open` drops whatever was already acquired in that same
/// order, so the caller either gets a fully-formed session or nothing.
pub struct OleAfx {
    dispatch: IDispatch,
    _unknown: IUnknown,
    _apartment: ComApartment,
}

impl OleAfx {
    /// Connect to a running AFxW instance.
    pub fn open() -> Result<Self, AfxError> {
        Self::open_prog_id(AFXW_PROG_ID)
    }

    fn open_prog_id(prog_id: &str) -> Result<Self, AfxError> {
        let apartment = ComApartment::enter()?;

        let wide = to_wide(prog_id);
        let clsid = unsafe { CLSIDFromProgID(PCWSTR(wide.as_ptr())) }
            .map_err(|e| AfxError::CreateInstance(e.message()))?;
        let unknown: IUnknown = unsafe { CoCreateInstance(&clsid, None, CLSCTX_ALL) }
            .map_err(|e| AfxError::CreateInstance(e.message()))?;

        let dispatch = unknown
            .cast::<IDispatch>()
            .map_err(|e| AfxError::QueryInterface(e.message()))?;

        Ok(Self {
            dispatch,
            _unknown: unknown,
            _apartment: apartment,
        })
    }

    /// Late-bound method call. `operation` names the logical operation in
    /// errors; `method` is the dispatch name AFxW knows.
    fn call(
        &self,
        operation: &'static str,
        method: &str,
        mut args: Vec<VARIANT>,
    ) -> Result<VARIANT, AfxError> {
        let remote = |e: windows::core::Error| AfxError::Remote {
            operation,
            message: e.message(),
        };

        let wide = to_wide(method);
        let names = [PCWSTR(wide.as_ptr())];
        let mut dispid = 0i32;
        unsafe {
            self.dispatch.GetIDsOfNames(
                &GUID::zeroed(),
                names.as_ptr(),
                1,
                LOCALE_SYSTEM_DEFAULT,
                &mut dispid,
            )
        }
        .map_err(remote)?;

        // IDispatch takes its argument list right-to-left.
        args.reverse();
        let params = DISPPARAMS {
            rgvarg: args.as_mut_ptr(),
            cArgs: args.len() as u32,
            ..Default::default()
        };

        let mut result = VARIANT::default();
        unsafe {
            self.dispatch.Invoke(
                dispid,
                &GUID::zeroed(),
                LOCALE_SYSTEM_DEFAULT,
                DISPATCH_METHOD,
                &params,
                Some(&mut result),
                None,
                None,
            )
        }
        .map_err(remote)?;

        Ok(result)
    }
}

impl Afx for OleAfx {
    fn histories(&self, windows: &[Window]) -> Result<Vec<String>, AfxError> {
        collect_histories(
            windows,
            |win| {
                let count =
                    self.call("HisDirCount", "HisDirCount", vec![VARIANT::from(win.id())])?;
                i32::try_from(&count).map_err(|e| AfxError::Remote {
                    operation: "HisDirCount",
                    message: e.message(),
                })
            },
            |win, index| {
                let entry = self.call(
                    "HisDir",
                    "HisDir",
                    vec![VARIANT::from(win.id()), VARIANT::from(index)],
                )?;
                variant_to_string("HisDir", &entry)
            },
        )
    }

    fn change_directory(&self, path: &str) -> Result<(), AfxError> {
        let command = excd_command(path);
        self.call("EXCD", "Exec", vec![VARIANT::from(command.as_str())])?;
        Ok(())
    }

    fn active_path(&self) -> Result<String, AfxError> {
        // $P expands to the active pane's current directory.
        let path = self.call("Extract", "Extract", vec![VARIANT::from("$P")])?;
        variant_to_string("Extract", &path)
    }
}

fn variant_to_string(operation: &'static str, value: &VARIANT) -> Result<String, AfxError> {
    BSTR::try_from(value)
        .map(|s| s.to_string())
        .map_err(|e| AfxError::Remote {
            operation,
            message: e.message(),
        })
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

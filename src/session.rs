#[cfg(windows)]
use windows::Win32::System::Com::{
    CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE,
};

#[derive(thiserror::Error, Debug)]
#[error("Failed to initialize the platform metadata service: {0}")]
pub struct InitError(String);

/// Keeps the host's metadata service available for as long as it is alive.
///
/// On Windows this is a COM apartment for the property system. Other hosts
/// read files directly and need no setup.
#[derive(Debug)]
pub struct Session {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Session {
    pub fn start() -> Result<Self, InitError> {
        #[cfg(windows)]
        {
            let flags = COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE;
            let hr = unsafe { CoInitializeEx(None, flags) };
            hr.ok().map_err(|e| InitError(e.to_string()))?;
        }
        log::debug!("metadata session started");
        Ok(Self {
            _not_send: std::marker::PhantomData,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        #[cfg(windows)]
        unsafe {
            CoUninitialize()
        };
        log::debug!("metadata session closed");
    }
}

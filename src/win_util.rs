//! Win32 binding for [`WindowBackend`](crate::window_manager::WindowBackend).

#[cfg(target_os = "windows")]
pub use win32::Win32Backend;

#[cfg(target_os = "windows")]
mod win32 {
    use crate::geometry::{Coord, ScreenSize, WindowRect};
    use crate::window_manager::{RawWindow, WindowBackend};
    use windows::Win32::Foundation::{BOOL, HWND, POINT, RECT};
    use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON};
    use windows::Win32::UI::WindowsAndMessaging::{
        GetCursorPos, GetForegroundWindow, GetSystemMetrics, GetWindowRect,
        GetWindowTextLengthW, GetWindowThreadProcessId, MoveWindow, SM_CXSCREEN, SM_CYSCREEN,
    };

    fn hwnd(window: RawWindow) -> HWND {
        HWND(window.0 as *mut core::ffi::c_void)
    }

    #[derive(Debug, Default)]
    pub struct Win32Backend;

    impl Win32Backend {
        pub fn new() -> Self {
            Self
        }
    }

    impl WindowBackend for Win32Backend {
        fn foreground_window(&self) -> RawWindow {
            let hwnd = unsafe { GetForegroundWindow() };
            RawWindow(hwnd.0 as isize)
        }

        fn window_rect(&self, window: RawWindow) -> WindowRect {
            if window.is_none() {
                return WindowRect::default();
            }
            let mut rect = RECT::default();
            if unsafe { GetWindowRect(hwnd(window), &mut rect) }.is_err() {
                return WindowRect::default();
            }
            WindowRect::new(
                rect.left,
                rect.top,
                rect.right - rect.left,
                rect.bottom - rect.top,
            )
        }

        fn move_resize(&self, window: RawWindow, rect: WindowRect) {
            if window.is_none() {
                return;
            }
            let result = unsafe {
                MoveWindow(
                    hwnd(window),
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    BOOL::from(true),
                )
            };
            if let Err(err) = result {
                tracing::trace!(?err, ?window, "MoveWindow failed");
            }
        }

        fn window_identity(&self, window: RawWindow) -> u32 {
            if window.is_none() {
                return 0;
            }
            unsafe {
                // Untitled windows are transient helpers the shell cycles
                // through before the real target gains focus.
                if GetWindowTextLengthW(hwnd(window)) <= 0 {
                    return 0;
                }
                let mut pid = 0u32;
                let _ = GetWindowThreadProcessId(hwnd(window), Some(&mut pid));
                pid
            }
        }

        fn pointer_position(&self) -> Option<Coord> {
            let mut pt = POINT::default();
            if unsafe { GetCursorPos(&mut pt) }.is_ok() {
                Some(Coord::new(pt.x as f64, pt.y as f64))
            } else {
                None
            }
        }

        fn primary_button_pressed(&self) -> bool {
            (unsafe { GetAsyncKeyState(VK_LBUTTON.0 as i32) } as u16 & 0x8000) != 0
        }

        fn screen_size(&self) -> ScreenSize {
            unsafe { ScreenSize::new(GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
        }
    }
}

use crate::domain::ports::Notifier;

/// Modal OK box on Windows; a console prompt that waits for Enter elsewhere.
///
/// The console prompt only blocks when stdin is a terminal. Without one
/// (cron, CI, redirected input) the message is printed to stderr and
/// `message` returns at once.
#[derive(Debug, Clone, Default)]
pub struct NativeDialog;

#[cfg(windows)]
impl Notifier for NativeDialog {
    fn message(&self, title: &str, text: &str) {
        use windows::core::PCWSTR;
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::{
            MessageBoxW, MB_ICONINFORMATION, MB_OK, MB_SETFOREGROUND, MB_TOPMOST,
        };

        let wide_text: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
        let wide_title: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();

        // SAFETY: both buffers are NUL-terminated and outlive the call.
        unsafe {
            MessageBoxW(
                HWND::default(),
                PCWSTR(wide_text.as_ptr()),
                PCWSTR(wide_title.as_ptr()),
                MB_OK | MB_ICONINFORMATION | MB_TOPMOST | MB_SETFOREGROUND,
            );
        }
    }
}

#[cfg(not(windows))]
impl Notifier for NativeDialog {
    fn message(&self, title: &str, text: &str) {
        use std::io::IsTerminal;

        let stdin = std::io::stdin();
        let interactive = stdin.is_terminal();
        console_prompt(title, text, interactive, stdin.lock(), std::io::stderr());
    }
}

/// Prints the message and, when `interactive`, blocks until a line is read.
#[cfg(not(windows))]
fn console_prompt<R, W>(
    title: &str,
    text: &str,
    interactive: bool,
    mut input: R,
    mut output: W,
) where
    R: std::io::BufRead,
    W: std::io::Write,
{
    let _ = writeln!(output, "[{}] {}", title, text);
    if !interactive {
        return;
    }

    let _ = write!(output, "Press Enter to acknowledge...");
    let _ = output.flush();
    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        tracing::warn!("Could not read acknowledgement: {}", e);
    }
}

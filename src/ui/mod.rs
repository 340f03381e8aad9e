//! Player shell UI layer.
//!
//! Uses `wry` for the embedded player page and `tao` for the window and event
//! loop; the system tray comes from `tray-icon`:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView

pub mod webview_app;

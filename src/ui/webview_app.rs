//! Player window using `wry` + `tao`, with a `tray-icon` tray menu.
//!
//! Architecture:
//! - The player site is loaded straight into one WebView; navigations that
//!   leave the player host are cancelled and the player page is reloaded.
//! - Every toolkit callback (page load, navigation, tray, menu, capture
//!   timer) is turned into a `UserEvent` and handled on the event loop
//!   thread, which is the only place the WebView is touched.
//! - Media commands run on the tokio blocking pool so a slow bus call never
//!   stalls the event loop.

use std::sync::Mutex;
use std::time::Duration;

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::{Window, WindowBuilder};
use tracing::{debug, info, warn};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::app::App;
use crate::playback::surface::{decode_script_result, PageSurface, ScriptReply};
use crate::playback::timer::CaptureTimer;
use crate::shell::lifecycle::{CloseAction, TrayToggle};
use crate::shell::navigation::NavigationDecision;
use crate::types::command::MediaCommand;
use crate::types::errors::SurfaceError;

#[derive(Debug)]
enum UserEvent {
    LoadUrl(String),
    CaptureTick,
    PageLoaded(bool),
    Menu(MenuId),
    TrayActivated,
}

// ─── Page surface over the WebView ───

struct WebViewSurface<'a>(&'a WebView);

impl PageSurface for WebViewSurface<'_> {
    fn evaluate(&self, script: &str, reply: ScriptReply) -> Result<(), SurfaceError> {
        // wry wants a reusable callback; the reply runs at most once.
        let reply = Mutex::new(Some(reply));
        self.0
            .evaluate_script_with_callback(script, move |raw| {
                let pending = reply.lock().ok().and_then(|mut slot| slot.take());
                if let Some(reply) = pending {
                    reply(decode_script_result(&raw));
                }
            })
            .map_err(|e| SurfaceError::EvaluationFailed(e.to_string()))
    }

    fn execute(&self, script: &str) -> Result<(), SurfaceError> {
        self.0
            .evaluate_script(script)
            .map_err(|e| SurfaceError::EvaluationFailed(e.to_string()))
    }
}

// ─── Tray ───

struct TrayMenu {
    _tray: TrayIcon,
    show: MenuItem,
    play_pause: MenuItem,
    previous: MenuItem,
    next: MenuItem,
    hide_to_tray: CheckMenuItem,
    exit_directly: CheckMenuItem,
    quit: MenuItem,
}

impl TrayMenu {
    fn build(title: &str, close_to_tray: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let show = MenuItem::new("打开主窗口", true, None);
        let play_pause = MenuItem::new("播放/暂停", true, None);
        let previous = MenuItem::new("上一曲", true, None);
        let next = MenuItem::new("下一曲", true, None);
        let hide_to_tray = CheckMenuItem::new("隐藏到托盘", true, close_to_tray, None);
        let exit_directly = CheckMenuItem::new("直接退出", true, !close_to_tray, None);
        let quit = MenuItem::new("退出", true, None);

        let close_behaviour = Submenu::with_items("关闭行为", true, &[&hide_to_tray, &exit_directly])?;
        let menu = Menu::with_items(&[
            &show,
            &PredefinedMenuItem::separator(),
            &play_pause,
            &previous,
            &next,
            &PredefinedMenuItem::separator(),
            &close_behaviour,
            &PredefinedMenuItem::separator(),
            &quit,
        ])?;

        let (rgba, size) = note_icon_rgba();
        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(title)
            .with_icon(tray_icon::Icon::from_rgba(rgba, size, size)?)
            .build()?;

        Ok(Self {
            _tray: tray,
            show,
            play_pause,
            previous,
            next,
            hide_to_tray,
            exit_directly,
            quit,
        })
    }

    fn media_command(&self, id: &MenuId) -> Option<MediaCommand> {
        if id == self.play_pause.id() {
            Some(MediaCommand::PlayPause)
        } else if id == self.previous.id() {
            Some(MediaCommand::Previous)
        } else if id == self.next.id() {
            Some(MediaCommand::Next)
        } else {
            None
        }
    }

    fn sync_close_behaviour(&self, close_to_tray: bool) {
        self.hide_to_tray.set_checked(close_to_tray);
        self.exit_directly.set_checked(!close_to_tray);
    }
}

/// A 32x32 round green badge, generated so the shell ships no image assets.
fn note_icon_rgba() -> (Vec<u8>, u32) {
    const SIZE: u32 = 32;
    let center = (SIZE as f32 - 1.0) / 2.0;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let inside = dx * dx + dy * dy <= center * center;
            rgba.extend_from_slice(if inside { &[0xd4, 0x3c, 0x33, 0xff] } else { &[0, 0, 0, 0] });
        }
    }
    (rgba, SIZE)
}

fn show_window(window: &Window) {
    window.set_visible(true);
    window.set_minimized(false);
    window.set_focus();
}

fn forwarder(proxy: EventLoopProxy<UserEvent>) -> Mutex<EventLoopProxy<UserEvent>> {
    Mutex::new(proxy)
}

fn forward(proxy: &Mutex<EventLoopProxy<UserEvent>>, event: UserEvent) {
    if let Ok(proxy) = proxy.lock() {
        let _ = proxy.send_event(event);
    }
}

// ─── Main entry point ───

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut app = App::new();
    app.startup();
    let settings = app.settings().clone();

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title(&settings.window.title)
        .with_inner_size(tao::dpi::LogicalSize::new(
            settings.window.width as f64,
            settings.window.height as f64,
        ))
        .build(&event_loop)?;

    let tray = TrayMenu::build(&settings.window.title, settings.general.close_to_tray)?;

    let menu_proxy = forwarder(proxy.clone());
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        forward(&menu_proxy, UserEvent::Menu(event.id));
    }));

    let tray_proxy = forwarder(proxy.clone());
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        let activated = matches!(
            event,
            TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } | TrayIconEvent::DoubleClick { .. }
        );
        if activated {
            forward(&tray_proxy, UserEvent::TrayActivated);
        }
    }));

    let load_proxy = proxy.clone();
    let nav_proxy = proxy.clone();
    let guard = app.navigation.clone();

    let builder = WebViewBuilder::new()
        .with_url(&settings.general.player_url)
        .with_user_agent(settings.general.user_agent.as_str())
        .with_navigation_handler(move |url: String| match guard.check(&url) {
            NavigationDecision::Allow => true,
            NavigationDecision::Redirect(target) => {
                debug!(%url, "redirecting to player page");
                let _ = nav_proxy.send_event(UserEvent::LoadUrl(target));
                false
            }
        })
        .with_on_page_load_handler(move |event, url| {
            if let PageLoadEvent::Finished = event {
                debug!(%url, "page load finished");
                let _ = load_proxy.send_event(UserEvent::PageLoaded(true));
            }
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().ok_or("missing GTK container")?;
        builder.build_gtk(vbox)?
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window)?;

    let tick_proxy = proxy.clone();
    let mut capture_timer = Some(CaptureTimer::start(
        runtime.handle(),
        Duration::from_millis(settings.playback.capture_interval_ms),
        move || tick_proxy.send_event(UserEvent::CaptureTick).is_ok(),
    ));

    info!("player window ready");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        let mut exit = false;
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => match app.lifecycle.on_close_requested() {
                CloseAction::HideToTray => window.set_visible(false),
                CloseAction::Exit => exit = true,
            },

            Event::UserEvent(UserEvent::CaptureTick) => {
                app.playback.capture(&WebViewSurface(&webview));
            }

            Event::UserEvent(UserEvent::PageLoaded(ok)) => {
                let outcome = app.playback.on_page_loaded(&WebViewSurface(&webview), ok);
                debug!(?outcome, "restore after page load");
            }

            Event::UserEvent(UserEvent::LoadUrl(url)) => {
                if let Err(e) = webview.load_url(&url) {
                    warn!(%url, error = %e, "failed to load url");
                }
            }

            Event::UserEvent(UserEvent::TrayActivated) => {
                let visible = window.is_visible();
                let minimized = window.is_minimized();
                match app.lifecycle.on_tray_activated(visible, minimized) {
                    TrayToggle::Show => show_window(&window),
                    TrayToggle::Hide => window.set_visible(false),
                }
            }

            Event::UserEvent(UserEvent::Menu(id)) => {
                if let Some(command) = tray.media_command(&id) {
                    let dispatcher = app.dispatcher.clone();
                    runtime.spawn_blocking(move || dispatcher.dispatch(command));
                } else if id == *tray.show.id() {
                    show_window(&window);
                } else if id == *tray.hide_to_tray.id() {
                    app.lifecycle.set_close_to_tray(true);
                    tray.sync_close_behaviour(true);
                } else if id == *tray.exit_directly.id() {
                    app.lifecycle.set_close_to_tray(false);
                    tray.sync_close_behaviour(false);
                } else if id == *tray.quit.id() {
                    exit = true;
                }
            }

            _ => {}
        }

        if exit {
            if let Some(mut timer) = capture_timer.take() {
                timer.stop();
            }
            app.shutdown();
            *control_flow = ControlFlow::Exit;
        }
    });
}

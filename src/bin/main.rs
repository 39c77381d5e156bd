//! A diagnostic tool for Toaru Decor.
//!
//! Resolves the current user's GTK theme and logs what decorations would look like
//! with it, then watches the GTK settings file and does it again every time the
//! file changes. Runs until interrupted.
//!
//! Verbosity can be changed with `RUST_LOG`.

use std::cell::RefCell;
use std::error::Error;
use std::path::Path;
use std::rc::Rc;

use toaru_decor::config::{no_checks, DecorationConfig};
use toaru_decor::reexports::calloop::EventLoop;
use toaru_decor::render::{
    button_style, decoration_margins, title_color, title_font, titlebar_background, ButtonVisualState,
    DecorationLayout,
};
use toaru_decor::theme::fs::Filesystem;
use toaru_decor::types::Rectangle;
use toaru_decor::{SettingsWatch, StylesheetResolver, ToaruDecorConfig};

use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt as logger, fmt::format::FmtSpan, EnvFilter};

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    logger::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .from_env_lossy()
        )
        .try_init()?;

    let config = ToaruDecorConfig::builder().finish(no_checks)?;

    let resolver = Rc::new(RefCell::new(StylesheetResolver::from_env()));
    log_theme(&mut *resolver.borrow_mut(), &config);

    let Some(path) = resolver.borrow().settings_path().map(Path::to_path_buf) else {
        warn!("no settings file to watch, exiting");
        return Ok(())
    };

    let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new()?;

    let watched = Rc::clone(&resolver);
    let cfg = config.clone();
    let _watch = SettingsWatch::new(&event_loop.handle(), &path, move |_| {
        let mut resolver = watched.borrow_mut();
        resolver.invalidate();
        log_theme(&mut *resolver, &cfg);
    })?;

    event_loop.run(None, &mut (), |_| {})?;

    Ok(())
}

fn log_theme<F: Filesystem>(resolver: &mut StylesheetResolver<F>, config: &ToaruDecorConfig) {
    let snapshot = resolver.get_snapshot();
    info!("theme epoch {}, icon theme {}", resolver.epoch(), snapshot.icon_theme_name);

    for (label, active) in [("focused", true), ("unfocused", false)] {
        info!(
            "{label} titlebar: bg {:?}, fg {:?}",
            titlebar_background(&snapshot, config, active).rgba(),
            title_color(&snapshot, config, active).rgba(),
        );
    }
    info!("title font: {:?}", title_font(&snapshot, config));

    // a 640x480 window, decorated
    let outer = Rectangle::new(0, 0, 480, 640)
        .expand_by_margins(decoration_margins(config));
    let layout = DecorationLayout::new(outer, config);

    for (kind, rect) in &layout.buttons {
        let state = ButtonVisualState::new(rect.size.width, rect.size.height, 1.0, 0.0);
        let style = button_style(resolver, config, *kind, &state);
        match style.icon {
            Some(icon) => info!("{kind:?} button icon: {}", icon.display()),
            None => warn!("{kind:?} button icon {} not found", kind.icon_name()),
        }
    }

    if config.buttons().is_empty() {
        info!("no titlebar buttons configured");
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use value_context::{Context, ContextConfig, ContextExt, ContextRegistry, Memo};

#[derive(Debug, PartialEq)]
struct Theme {
    mode: &'static str,
    font_size: u8,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    info!("Started");

    let registry = ContextRegistry::new();

    let language = Context::with_config("english".to_string(), ContextConfig::named("language"));
    registry.register(&language);

    let header = language.on_value(|language| info!("Header rendered. language: {}", language))?;
    language.provide("french".to_string())?;

    let footer = language.on_value(|language| info!("Footer rendered. language: {}", language))?;
    language.provide("german".to_string())?;

    header.unsubscribe();
    language.provide("spanish".to_string())?;
    footer.unsubscribe();

    // the same theme is provided twice; the panel skips the second render because the memo hands
    // out the same allocation
    let memo = Memo::new();
    let theme_for = |mode: &'static str, font_size: u8| {
        memo.get((mode, font_size), |deps| Theme {
            mode: deps.0,
            font_size: deps.1,
        })
    };

    let theme = Context::with_config(theme_for("light", 12), ContextConfig::named("theme"));
    registry.register(&theme);

    let last_rendered: Arc<Mutex<Option<Arc<Theme>>>> = Arc::default();
    let _panel = theme.on_value(move |theme: &Arc<Theme>| {
        let mut last_rendered = last_rendered.lock();
        if last_rendered
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, theme))
        {
            info!("Panel unchanged, skipping render. theme: {:?}", theme);
            return;
        }
        info!("Panel rendered. theme: {:?}", theme);
        *last_rendered = Some(theme.clone());
    })?;

    theme.provide(theme_for("light", 12))?;
    theme.provide(theme_for("dark", 14))?;

    info!("Registered contexts. names: {:?}", registry.names());
    registry.dispose_all();

    info!("Finished");
    Ok(())
}

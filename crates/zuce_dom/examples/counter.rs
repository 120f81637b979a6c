//! Counter Demo
//!
//! Builds a small counter app on the in-memory host, clicks it a few times,
//! resizes it and prints the resulting tree and stylesheet.
//!
//! Run with: cargo run -p zuce_dom --example counter
//! Set `RUST_LOG=zuce_dom=trace` to see every socket pass.

use std::rc::Rc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use zuce_dom::prelude::*;
use zuce_platform::memory::MemoryHost;
use zuce_platform::HostSize;

fn main() -> zuce_dom::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("zuce_dom=debug,zuce_style=debug")),
        )
        .init();

    let host = Rc::new(MemoryHost::new());
    zuce_dom::install(host.clone());

    let options = StartOptions::from_toml_str(
        r#"
        resize_throttle_ms = 50

        [normalize]
        margin = 0
        boxSizing = "border-box"
        "#,
    )?;

    let count = signal(0);
    let mount = start(move || counter_app(&count), options)?;
    let button = host
        .find_by_id("increment")
        .expect("counter button is mounted");

    for _ in 0..3 {
        host.dispatch(button, "click");
    }
    host.resize(mount.root_handle(), HostSize::new(720.0, 480.0));
    host.advance(Duration::from_millis(50));

    println!("{}", host.to_html(host.root()));
    for rule in host.rules() {
        println!("{rule}");
    }
    Ok(())
}

fn counter_app(count: &Signal<i32>) -> Element<()> {
    let clicks = count.clone();
    let button = count
        .button(("Clicked ", |src: &Source<i32>| *src.state(), " times"))
        .attributes(Attributes::from([("id", "increment")]))
        .events(Events::new().on("click", move |_| clicks.update(|n| n + 1)))
        .styles(|src: &Source<i32>| {
            let hot = *src.state() >= 3;
            StyleSet::new()
                .set("padding", 8)
                .set("color", if hot { "crimson" } else { "black" })
                .set("transition", 0.2)
        });

    div((h1(("Counter",)), button)).styles(|src: &Source<()>| {
        let wide = src.host().size().width >= 640.0;
        StyleSet::new()
            .set("display", "flex")
            .set("flexDirection", if wide { "row" } else { "column" })
            .set("gap", 12)
    })
}

//! Example: a tiny game loop wired through chanbus.
//!
//! Shows:
//! - listeners with owners on the default channel and a UI channel;
//! - a failing and a panicking listener that do not stop delivery;
//! - a `LazySingleton` resolved through a toy host and frozen on shutdown.
//!
//! Run with:
//! ```bash
//! RUST_LOG=chanbus=debug cargo run --example game_loop
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chanbus::{BoxError, EventBus, Host, LazySingleton, Listener, ListenerResult, MemorySink};
use tracing_subscriber::EnvFilter;

const UI: i32 = 1;

#[derive(Debug)]
struct Tick {
    frame: u32,
}

#[derive(Debug)]
struct Damage {
    amount: u32,
}

struct Scoreboard {
    points: AtomicU32,
}

static SCOREBOARD: LazySingleton<Scoreboard> = LazySingleton::new();

#[derive(Default)]
struct World {
    objects: Mutex<Vec<(String, Arc<Scoreboard>)>>,
}

impl Host<Scoreboard> for World {
    fn find_existing(&self) -> Option<Arc<Scoreboard>> {
        self.objects.lock().ok()?.first().map(|(_, s)| Arc::clone(s))
    }

    fn construct(&self, container: &str) -> Result<Arc<Scoreboard>, BoxError> {
        let board = Arc::new(Scoreboard {
            points: AtomicU32::new(0),
        });
        self.objects
            .lock()
            .map_err(|e| e.to_string())?
            .push((container.to_owned(), Arc::clone(&board)));
        println!("[world] spawned `{container}`");
        Ok(board)
    }

    fn destroy(&self, instance: &Arc<Scoreboard>) {
        if let Ok(mut objects) = self.objects.lock() {
            objects.retain(|(_, s)| !Arc::ptr_eq(s, instance));
        }
    }

    fn make_persistent(&self, _instance: &Arc<Scoreboard>) {
        println!("[world] scoreboard survives scene loads");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chanbus=info")),
        )
        .init();

    let world = Arc::new(World::default());
    let failures = Arc::new(MemorySink::new());
    let bus = EventBus::builder().with_sink(failures.clone()).build();

    let w = Arc::clone(&world);
    let scorer = Listener::new(move |t: &Tick| {
        if let Ok(board) = SCOREBOARD.instance(&*w) {
            board.points.fetch_add(t.frame, Ordering::Relaxed);
        }
    })
    .with_owner("Player");

    let hud = Listener::new(|d: &Damage| println!("[hud] -{} hp", d.amount))
        .with_name("Hud.flash")
        .with_owner("Canvas");

    let shield = Listener::fallible(|d: &Damage| -> ListenerResult {
        if d.amount > 50 {
            return Err(format!("shield cannot absorb {}", d.amount).into());
        }
        Ok(())
    })
    .with_name("Shield.absorb")
    .with_owner("Player");

    let glitchy = Listener::new(|t: &Tick| {
        if t.frame == 2 {
            panic!("particle pool exhausted");
        }
    })
    .with_name("Particles.update");

    bus.add_listener(&scorer);
    bus.add_listener(&glitchy);
    bus.add_listener_on(UI, &shield);
    bus.add_listener_on(UI, &hud);

    for frame in 1..=3 {
        bus.publish(Tick { frame });
        bus.publish_on(UI, Damage { amount: frame * 30 });
    }

    #[cfg(feature = "introspection")]
    for info in bus.listeners() {
        println!("[bus] {}", info.name);
    }

    bus.remove_listener(&glitchy);
    bus.publish(Tick { frame: 4 });

    SCOREBOARD.on_teardown_begin();
    let board = SCOREBOARD.instance(&*world)?;
    println!("[game] final score {}", board.points.load(Ordering::Relaxed));

    for report in failures.snapshot() {
        println!("[diag] {} {}: {}", report.label, report.listener, report.message);
    }
    Ok(())
}

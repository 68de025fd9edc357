//! Headless driver for the particle backdrop
//!
//! Runs the full simulation and renderer against a recording surface at
//! display rate and logs what each second of frames contained.
//!
//! Run with: cargo run --features cli --bin backdrop-cli

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::str::FromStr;
    use std::time::{Duration, Instant};

    use anyhow::Context;
    use particle_backdrop::core::{DeviceClass, ParticleConfig, Point, Simulation, Size};
    use particle_backdrop::render::{Backdrop, QueuedScheduler, RecordingSurface, Renderer};
    use tracing::{debug, info};
    use tracing_subscriber::{fmt, EnvFilter};

    /// Parse `name` from the environment, or fall back to `default` when unset.
    fn env_parse<T>(name: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match std::env::var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {}={:?}", name, raw)),
            Err(_) => Ok(default),
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,particle_backdrop=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let width: f64 = env_parse("BACKDROP_WIDTH", 1280.0)?;
    let height: f64 = env_parse("BACKDROP_HEIGHT", 720.0)?;
    let compact: bool = env_parse("BACKDROP_COMPACT", false)?;
    let max_frames: u64 = env_parse("BACKDROP_FRAMES", 600)?;
    let seed: Option<u64> = match std::env::var("BACKDROP_SEED") {
        Ok(_) => Some(env_parse("BACKDROP_SEED", 0)?),
        Err(_) => None,
    };

    let class = if compact { DeviceClass::Compact } else { DeviceClass::Full };
    let mut config = ParticleConfig::for_device(class);
    if let Ok(path) = std::env::var("BACKDROP_CONFIG") {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path))?;
        config = config
            .merged_with_json(&json)
            .with_context(|| format!("parsing config {}", path))?;
        info!(path = %path, "Loaded particle config");
    }

    info!(
        width,
        height,
        ?class,
        particles = config.particle_count,
        frames = max_frames,
        "Starting headless backdrop"
    );

    let mut surface = RecordingSurface::new(Size::new(width, height), 1.0);
    // The live compact check reads the viewport, so keep it consistent with the preset.
    surface.set_viewport_width(if compact { 375.0 } else { width });

    let renderer = match seed {
        Some(seed) => Renderer::with_seed(surface, Simulation::with_seed(config, seed), seed),
        None => Renderer::new(surface, Simulation::new(config)),
    };
    let mut backdrop = Backdrop::new(renderer, QueuedScheduler::new());
    backdrop.start(true);

    let center = Point::new(width / 2.0, height / 2.0);
    let orbit_radius = width.min(height) / 4.0;

    let start_time = Instant::now();
    let mut frame_interval = tokio::time::interval(Duration::from_micros(16_667));
    let mut stats_interval = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last = None;
    let mut connections_total = 0u64;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                if !backdrop.scheduler_mut().take() {
                    continue;
                }

                // Pointer orbits the center for 3 s, then leaves for 2 s.
                let t = start_time.elapsed().as_secs_f64();
                if t % 5.0 < 3.0 {
                    let angle = t * std::f64::consts::PI;
                    backdrop.pointer_moved(Point::new(
                        center.x + orbit_radius * angle.cos(),
                        center.y + orbit_radius * angle.sin(),
                    ));
                } else {
                    backdrop.pointer_left();
                }

                if let Some(stats) = backdrop.on_frame() {
                    connections_total += stats.connections as u64;
                    last = Some(stats);
                }
                if backdrop.frames() >= max_frames {
                    break;
                }
            }
            _ = stats_interval.tick() => {
                if let Some(stats) = last {
                    info!(
                        frames = backdrop.frames(),
                        particles = stats.particles,
                        shooting = stats.shooting,
                        connections = stats.connections,
                        commands = backdrop.renderer().surface().commands().len(),
                        "stats"
                    );
                }
            }
            _ = &mut ctrl_c => {
                debug!("Interrupted");
                break;
            }
        }
    }

    backdrop.stop();
    let frames = backdrop.frames();
    info!(
        frames,
        elapsed = format!("{:.1}s", start_time.elapsed().as_secs_f64()),
        avg_connections = format!("{:.1}", connections_total as f64 / frames.max(1) as f64),
        "Headless backdrop finished"
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

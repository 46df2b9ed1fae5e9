use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use maze_chase::app_state::AppState;
use maze_chase::config::GameConfig;
use maze_chase::plugins::autopilot::AutopilotPlugin;
use maze_chase::plugins::game_over::SessionReport;
use micromegas_telemetry_sink::TelemetryGuardBuilder;
use micromegas_telemetry_sink::tracing_interop::TracingCaptureLayer;
use micromegas_tracing::dispatch::init_thread_stream;
use micromegas_tracing::levels::LevelFilter;
use micromegas_tracing::prelude::info;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

fn main() {
    // 1. Initialize telemetry (LocalEventSink writes to stdout).
    //    Spans require MICROMEGAS_ENABLE_CPU_TRACING=true; logs and metrics
    //    always work.
    let _telemetry_guard = TelemetryGuardBuilder::default()
        .with_install_tracing_capture(false)
        .build()
        .expect("failed to initialize telemetry");

    // 2. Route `tracing` events (Bevy's own logs) into Micromegas.
    let log_layer = TracingCaptureLayer {
        max_level: LevelFilter::Info,
    };
    let subscriber = Registry::default().with(log_layer);
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).expect("failed to load config"),
        None => GameConfig::default(),
    };
    info!(
        "maze-chase starting: {}x{} maze, tick {}ms",
        config.width, config.height, config.tick_ms
    );

    // 3. Pre-init ComputeTaskPool with Micromegas thread callbacks, before
    //    TaskPoolPlugin would create its own.
    ComputeTaskPool::get_or_init(|| {
        TaskPoolBuilder::new()
            .on_thread_spawn(|| {
                init_thread_stream();
            })
            .on_thread_destroy(|| {
                micromegas_tracing::dispatch::flush_thread_buffer();
                micromegas_tracing::dispatch::unregister_thread_stream();
            })
            .build()
    });

    // 4. Run the headless game until it ends or hits the frame limit.
    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(config.tick())))
        .add_plugins(StatesPlugin)
        .insert_resource(config)
        .add_plugins(maze_chase::MazeChasePlugin)
        .add_plugins(AutopilotPlugin)
        .add_systems(Last, exit_when_done)
        .run();
}

/// Stop once a session report exists or the configured frame budget is spent.
fn exit_when_done(
    mut frames: Local<u64>,
    config: Res<GameConfig>,
    state: Res<State<AppState>>,
    report: Option<Res<SessionReport>>,
    mut exit: MessageWriter<AppExit>,
) {
    *frames += 1;

    if let Some(report) = report {
        println!("{}", report.submission.to_json());
        exit.write(AppExit::Success);
        return;
    }

    if config.max_frames.is_some_and(|max| *frames >= max) {
        info!("frame limit reached in {:?}", state.get());
        exit.write(AppExit::Success);
    }
}

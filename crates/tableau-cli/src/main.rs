use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tableau_compose::{interpret, Composition, RecordingRenderer};
use tableau_core::TableauConfig;
use tableau_ir::{validate_scene, SceneSpec};

#[derive(Parser)]
#[command(
    name = "tableau",
    version,
    about = "Tableau: declarative scenes for educational animations",
    long_about = "Tableau composes scene descriptions into a laid-out element tree and a timeline,\nthen drives a renderer through it. Without a rendering engine attached it\nrecords the directives a renderer would receive."
)]
struct Cli {
    /// Path to a tableau.toml (default: ./tableau.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenes
    List,

    /// Parse, validate and compose a scene without running it
    Check {
        /// Built-in scene name or path to a .json scene file
        scene: String,
    },

    /// Print the composed element tree and timeline of a scene
    Inspect {
        /// Built-in scene name or path to a .json scene file
        scene: String,
    },

    /// Compose a scene and run it against the recording renderer
    Run {
        /// Built-in scene name or path to a .json scene file
        scene: String,

        /// Write the recorded directives to this JSON file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write the recorded directives to <output dir>/<scene>.directives.json
        #[arg(long, conflicts_with = "out")]
        save: bool,
    },

    /// Write a default tableau.toml
    Init {
        #[arg(default_value = TableauConfig::FILE_NAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Check { scene } => cmd_check(&scene, &load_config(cli.config.as_deref())?),
        Commands::Inspect { scene } => cmd_inspect(&scene, &load_config(cli.config.as_deref())?),
        Commands::Run { scene, out, save } => {
            cmd_run(&scene, out, save, &load_config(cli.config.as_deref())?)
        }
        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

fn load_config(path: Option<&Path>) -> Result<TableauConfig> {
    let config = TableauConfig::discover(path).context("failed to load configuration")?;
    tracing::debug!("config: {:?}", config);
    Ok(config)
}

/// A path to an existing file wins over a built-in scene of the same name.
fn load_scene(scene: &str) -> Result<SceneSpec> {
    let path = Path::new(scene);
    if path.is_file() {
        SceneSpec::load(path).with_context(|| format!("failed to load scene file: {}", path.display()))
    } else {
        tableau_scenes::load(scene).with_context(|| format!("failed to load scene '{}'", scene))
    }
}

fn compose(spec: &SceneSpec, config: &TableauConfig) -> Result<Composition> {
    interpret(spec, config).with_context(|| format!("failed to compose scene '{}'", spec.id))
}

fn cmd_list() -> Result<()> {
    println!("Built-in scenes:");
    for info in tableau_scenes::available_scenes() {
        println!("  - {} ({})", info.name, info.description);
    }
    Ok(())
}

fn cmd_check(scene: &str, config: &TableauConfig) -> Result<()> {
    println!("🔍 Checking {}", scene);

    let spec = load_scene(scene)?;
    println!("   ✓ Parse OK");

    validate_scene(&spec).map_err(|errors| {
        let msgs: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!("Validation errors:\n  {}", msgs.join("\n  "))
    })?;
    println!("   ✓ Validate OK");

    let composition = compose(&spec, config)?;
    println!(
        "   ✓ Compose OK ({} elements, {} steps, {})",
        composition.elements.len(),
        composition.timeline.len(),
        composition.duration()
    );

    println!();
    println!("   ✅ No errors found.");
    Ok(())
}

fn cmd_inspect(scene: &str, config: &TableauConfig) -> Result<()> {
    let spec = load_scene(scene)?;
    let composition = compose(&spec, config)?;

    println!("🔍 Tableau Scene Inspector");
    println!(
        "📦 Scene: {}{}",
        composition.scene,
        composition
            .title
            .as_deref()
            .map(|t| format!(" \"{}\"", t))
            .unwrap_or_default()
    );
    if let Some(camera) = &composition.camera {
        println!("🎥 Camera: phi={}° theta={}°", camera.phi, camera.theta);
    }

    println!("├── 🧱 Elements ({} total)", composition.elements.len());
    for (i, element) in composition.elements.iter().enumerate() {
        let prefix = if i + 1 == composition.elements.len() { "└──" } else { "├──" };
        println!(
            "│   {} {} '{}' {} at {} ({:.2} x {:.2})",
            prefix,
            element.kind(),
            element.id,
            element.summary(),
            element.bounds.center,
            element.bounds.width,
            element.bounds.height
        );
    }

    println!(
        "├── ⏱️  Timeline ({} steps, {}, {} frames @ {} fps)",
        composition.timeline.len(),
        composition.duration(),
        composition.frame_count(),
        composition.fps
    );
    for (i, step) in composition.timeline.iter().enumerate() {
        let prefix = if i + 1 == composition.timeline.len() { "└──" } else { "├──" };
        let names: Vec<&str> = step.elements.iter().map(|e| e.as_str()).collect();
        println!(
            "│   {} {} (frame {}) {} [{}] {}",
            prefix,
            step.start,
            step.start.to_frame(composition.fps),
            step.action,
            names.join(", "),
            step.run_time
        );
    }

    let fingerprint = composition.fingerprint()?;
    println!("└── 🔑 Fingerprint: {}", fingerprint);
    Ok(())
}

fn cmd_run(scene: &str, out: Option<PathBuf>, save: bool, config: &TableauConfig) -> Result<()> {
    let spec = load_scene(scene)?;
    let composition = compose(&spec, config)?;

    let mut recorder = RecordingRenderer::new();
    let report = composition
        .run(&mut recorder)
        .with_context(|| format!("failed to run scene '{}'", spec.id))?;

    println!("🎬 {} (run {})", report.scene, report.run_id);
    for call in recorder.calls() {
        println!("   {}", call);
    }
    println!();
    println!(
        "   ✅ {} elements, {} steps, {} / {} frames ({})",
        report.constructed,
        report.steps,
        report.duration,
        report.frames,
        report.fingerprint.short()
    );

    let target = match out {
        Some(path) => Some(path),
        None if save => Some(
            PathBuf::from(&config.output.dir).join(format!("{}.directives.json", report.scene)),
        ),
        None => None,
    };
    if let Some(path) = target {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        recorder
            .export(&path)
            .with_context(|| format!("failed to write directives: {}", path.display()))?;
        tracing::info!("wrote {} directives to {}", recorder.calls().len(), path.display());
        println!("   📄 Directives: {}", path.display());
    }
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    TableauConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use viewer_core::{decode_glb, Command, Language, Marker, ModelInfo, Store};

#[derive(Parser)]
#[command(name = "glb-markers")]
#[command(about = "Inspect GLB files and marker scene documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a .glb file and print what it contains
    Inspect { file: PathBuf },
    /// Import a scene document into an empty scene and report what was applied
    Check { scene: PathBuf },
    /// Append a blank marker and print the exported document
    NewMarker {
        #[arg(long)]
        title_en: Option<String>,
        #[arg(long)]
        title_de: Option<String>,
        /// Scene document to start from
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match Cli::parse().command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Check { scene } => check(&scene),
        Commands::NewMarker {
            title_en,
            title_de,
            scene,
        } => new_marker(title_en, title_de, scene.as_deref()),
    }
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let model = decode_glb(&bytes).with_context(|| format!("decoding {}", path.display()))?;
    print_info(&model.info);
    println!("triangles:   {}", model.mesh.triangle_count());
    Ok(())
}

fn print_info(info: &ModelInfo) {
    println!("bytes:       {}", info.byte_len);
    println!("meshes:      {}", info.mesh_count);
    println!("nodes:       {}", info.node_count);
    println!("primitives:  {}", info.primitive_count);
    println!("materials:   {}", info.material_count);
    println!("animations:  {}", info.animation_count);
    if !info.extensions_required.is_empty() {
        println!("requires:    {}", info.extensions_required.join(", "));
    }
    match &info.bounds {
        Some(b) => {
            let size = b.size();
            println!("size:        {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);
        }
        None => println!("size:        (no geometry)"),
    }
}

fn load_scene(path: &Path) -> Result<Store> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut store = Store::new();
    store
        .dispatch(Command::Import(text))
        .with_context(|| format!("importing {}", path.display()))?;
    Ok(store)
}

fn check(path: &Path) -> Result<()> {
    let store = load_scene(path)?;
    if let Some(report) = store.last_import() {
        println!("applied: {}", report.applied.join(", "));
        if !report.ignored.is_empty() {
            println!("ignored: {}", report.ignored.join(", "));
        }
    }
    println!("markers: {}", store.state().markers.len());

    let exported = store.export()?;
    let mut again = Store::new();
    again.dispatch(Command::Import(exported.clone()))?;
    if again.export()? == exported {
        println!("round-trip: ok");
        Ok(())
    } else {
        anyhow::bail!("re-importing the export produced a different document")
    }
}

fn new_marker(
    title_en: Option<String>,
    title_de: Option<String>,
    scene: Option<&Path>,
) -> Result<()> {
    let mut store = match scene {
        Some(path) => load_scene(path)?,
        None => Store::new(),
    };
    let mut marker = Marker::blank();
    for (language, title) in [(Language::En, title_en), (Language::De, title_de)] {
        if let Some(title) = title {
            marker = marker.with_title(language, title);
        }
    }
    log::info!("[markers] adding {}", marker.id);
    store.dispatch(Command::AddMarker(marker))?;
    println!("{}", store.export()?);
    Ok(())
}

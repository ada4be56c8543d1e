//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use studio_core::{ArtifactId, Gallery, Palette, Primitive, Style, BUILTIN_PRIMITIVES};
use studio_renderer::export::ArtworkInfo;
use studio_renderer::{ArtStudio, ExportBundle, ManualScheduler, ModelViewer, Notice, NoticeLevel};

use crate::{CliArgs, Command, GalleryAction, GenerateArgs, StudioConfig, ViewerConfig};

/// Run the parsed command.
///
/// # Errors
///
/// Returns an error if the command fails; warnings are logged and do not
/// fail the command.
pub fn run(args: &CliArgs) -> anyhow::Result<()> {
    match &args.command {
        Command::Generate(generate) => {
            let config = StudioConfig::from(args);
            run_generate(&config, generate)
        }
        Command::Project(view) => {
            let config = ViewerConfig::from_args(args, view);
            let path = run_project(&config, &view.out)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Animate { view, frames } => {
            let config = ViewerConfig::from_args(args, view);
            let path = run_animate(&config, *frames, &view.out)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Gallery { action } => {
            let gallery = open_gallery(args.gallery_dir.as_deref())?;
            run_gallery(&gallery, action)
        }
        Command::Catalog => {
            print!("{}", catalog());
            Ok(())
        }
    }
}

/// Report a notice through the log and turn errors into `anyhow` errors.
fn check(notice: Notice) -> anyhow::Result<()> {
    match notice.level {
        NoticeLevel::Info => {
            tracing::info!("{}", notice.message);
            Ok(())
        }
        NoticeLevel::Warning => {
            tracing::warn!("{}", notice.message);
            Ok(())
        }
        NoticeLevel::Error => Err(anyhow!(notice.message)),
    }
}

fn notice_error(notice: Notice) -> anyhow::Error {
    anyhow!(notice.message)
}

/// Open the gallery directory and load what is there. Without a directory
/// the gallery lives only for this run.
///
/// # Errors
///
/// Returns an error if the directory can't be created or read.
pub fn open_gallery(dir: Option<&Path>) -> anyhow::Result<Gallery> {
    let Some(dir) = dir else {
        return Ok(Gallery::new());
    };
    let gallery = Gallery::with_data_dir(dir)
        .with_context(|| format!("Failed to open gallery at {}", dir.display()))?;
    let loaded = gallery.load_from_disk()?;
    tracing::debug!("Loaded {loaded} artworks from {}", dir.display());
    Ok(gallery)
}

/// Build a studio from the configuration.
///
/// # Errors
///
/// Returns an error for an invalid palette or complexity.
pub fn configure_studio(config: &StudioConfig, gallery: Gallery) -> anyhow::Result<ArtStudio> {
    let mut studio = ArtStudio::new(config.width, config.height, gallery);
    studio.set_style(config.style);
    studio.set_palette(&config.palette).map_err(notice_error)?;
    studio.set_complexity(config.complexity).map_err(notice_error)?;
    studio.set_seed(config.seed);
    if let Some(source) = &config.source {
        check(studio.load_source(source))?;
    }
    Ok(studio)
}

fn default_name(style: Style, seed: Option<u64>) -> String {
    match seed {
        Some(seed) => format!("{} {seed}", style.display_name()),
        None => format!("{} {}", style.display_name(), ArtifactId::new()),
    }
}

/// Generate, export, and optionally save one artwork.
///
/// # Errors
///
/// Returns an error if generation, export or saving fails.
pub fn run_generate(config: &StudioConfig, args: &GenerateArgs) -> anyhow::Result<()> {
    let gallery = open_gallery(config.gallery_dir.as_deref())?;
    let mut studio = configure_studio(config, gallery)?;

    let stats = studio.generate().map_err(notice_error)?;
    tracing::info!(
        style = %config.style,
        shapes = stats.shapes,
        connections = stats.connections,
        fractal_nodes = stats.fractal_nodes,
        "Generated {}x{} artwork",
        config.width,
        config.height
    );
    println!("{}", serde_json::to_string(&stats)?);

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| default_name(config.style, config.seed));
    let info = ArtworkInfo::named(name).with_description(args.description.clone());
    let bundle = studio.export(&info).map_err(notice_error)?;
    let (image, metadata) = bundle.write_to_dir(&args.out)?;
    println!("{}", image.display());
    println!("{}", metadata.display());

    if args.save {
        if config.gallery_dir.is_none() {
            tracing::warn!("No gallery directory set; the saved artwork lasts only for this run");
        }
        let id = studio.save().map_err(notice_error)?;
        println!("{id}");
    }
    Ok(())
}

fn viewer(config: &ViewerConfig) -> anyhow::Result<ModelViewer<ManualScheduler>> {
    let primitive = Primitive::builtin(&config.primitive)?;
    let mut viewer = ModelViewer::new(
        config.width,
        config.height,
        primitive,
        ManualScheduler::new(),
        config.animation,
    );
    viewer.set_transform(config.transform());
    Ok(viewer)
}

fn write_png(path: &Path, png: &[u8]) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Render one wireframe frame to a PNG file.
///
/// # Errors
///
/// Returns an error for an unknown primitive or if the file can't be written.
pub fn run_project(config: &ViewerConfig, out: &Path) -> anyhow::Result<PathBuf> {
    let mut viewer = viewer(config)?;
    if let Some(notice) = viewer.render_still().map_err(notice_error)? {
        check(notice)?;
    }
    write_png(out, &viewer.snapshot().map_err(notice_error)?)
}

/// Auto-rotate for `frames` frames and write the last frame.
///
/// # Errors
///
/// Returns an error if a frame fails or the file can't be written.
pub fn run_animate(config: &ViewerConfig, frames: usize, out: &Path) -> anyhow::Result<PathBuf> {
    let mut viewer = viewer(config)?;
    viewer.play();
    let handled = viewer.run_frames(frames).map_err(notice_error)?;
    viewer.pause();
    tracing::info!(
        frames = handled,
        rotation_y = viewer.transform().rotation().y,
        "Animation finished"
    );
    write_png(out, &viewer.snapshot().map_err(notice_error)?)
}

fn parse_id(id: &str) -> anyhow::Result<ArtifactId> {
    ArtifactId::parse(id).ok_or_else(|| anyhow!("Invalid artwork id: {id}"))
}

/// Run a gallery action.
///
/// # Errors
///
/// Returns an error for an unknown id or a filesystem failure.
pub fn run_gallery(gallery: &Gallery, action: &GalleryAction) -> anyhow::Result<()> {
    match action {
        GalleryAction::List => {
            for artifact in gallery.list() {
                println!(
                    "{}  {:<10}  complexity {:>2}  {}",
                    artifact.id,
                    artifact.style.as_str(),
                    artifact.complexity.get(),
                    artifact.created_at
                );
            }
            Ok(())
        }
        GalleryAction::Remove { id } => {
            let removed = gallery.remove(parse_id(id)?)?;
            tracing::info!("Removed artwork {}", removed.id);
            Ok(())
        }
        GalleryAction::Export { id, name, out } => {
            let artifact = gallery
                .get(parse_id(id)?)
                .ok_or_else(|| anyhow!("Artwork not found: {id}"))?;
            let name = name
                .clone()
                .unwrap_or_else(|| format!("{} {}", artifact.style.display_name(), artifact.id));
            let bundle = ExportBundle::from_artifact(&ArtworkInfo::named(name), &artifact);
            let (image, metadata) = bundle.write_to_dir(out)?;
            println!("{}", image.display());
            println!("{}", metadata.display());
            Ok(())
        }
    }
}

/// Styles, palette presets and primitives, one section per line.
#[must_use]
pub fn catalog() -> String {
    let styles: Vec<&str> = Style::ALL.iter().map(|s| s.as_str()).collect();
    let palettes = Palette::preset_names();
    format!(
        "styles: {}\npalettes: {}\nprimitives: {}\n",
        styles.join(", "),
        palettes.join(", "),
        BUILTIN_PRIMITIVES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(out: &Path, save: bool) -> GenerateArgs {
        GenerateArgs {
            style: None,
            palette: None,
            complexity: None,
            source: None,
            name: Some("Test Piece".to_string()),
            description: String::new(),
            out: out.to_path_buf(),
            save,
        }
    }

    fn small_config(style: Style) -> StudioConfig {
        StudioConfig {
            width: 64,
            height: 64,
            style,
            seed: Some(5),
            ..StudioConfig::new()
        }
    }

    #[test]
    fn test_generate_writes_bundle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = small_config(Style::Glitch);
        run_generate(&config, &generate_args(dir.path(), false)).expect("generate");
        assert!(dir.path().join("test-piece.png").exists());
        let json = std::fs::read_to_string(dir.path().join("test-piece-metadata.json"))
            .expect("metadata");
        assert!(json.contains("\"Glitch\""));
    }

    #[test]
    fn test_generate_save_persists_to_gallery() {
        let out = tempfile::tempdir().expect("out");
        let store = tempfile::tempdir().expect("store");
        let config = StudioConfig {
            gallery_dir: Some(store.path().to_path_buf()),
            ..small_config(Style::Pixel)
        };
        run_generate(&config, &generate_args(out.path(), true)).expect("generate");

        let gallery = open_gallery(Some(store.path())).expect("gallery");
        assert_eq!(gallery.len(), 1);
        let id = gallery.list()[0].id;

        run_gallery(
            &gallery,
            &GalleryAction::Export {
                id: id.to_string(),
                name: Some("Again".to_string()),
                out: out.path().join("again"),
            },
        )
        .expect("export");
        assert!(out.path().join("again").join("again.png").exists());

        run_gallery(&gallery, &GalleryAction::Remove { id: id.to_string() }).expect("remove");
        assert!(open_gallery(Some(store.path())).expect("reopen").is_empty());
    }

    #[test]
    fn test_invalid_complexity_is_error() {
        let config = StudioConfig {
            complexity: 0,
            ..small_config(Style::Abstract)
        };
        assert!(configure_studio(&config, Gallery::new()).is_err());
    }

    #[test]
    fn test_bad_source_only_warns() {
        let config = StudioConfig {
            source: Some("/no/such/image.png".to_string()),
            ..small_config(Style::Abstract)
        };
        let studio = configure_studio(&config, Gallery::new()).expect("studio");
        assert!(!studio.has_source());
    }

    #[test]
    fn test_project_and_animate_write_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = ViewerConfig::new(64, 64);
        config.primitive = "star".to_string();

        let still = run_project(&config, &dir.path().join("still.png")).expect("project");
        let moving = run_animate(&config, 12, &dir.path().join("nested/anim.png")).expect("animate");
        assert_eq!(&std::fs::read(still).expect("still")[1..4], b"PNG");
        assert_eq!(&std::fs::read(moving).expect("anim")[1..4], b"PNG");
    }

    #[test]
    fn test_unknown_primitive_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = ViewerConfig::new(64, 64);
        config.primitive = "blob".to_string();
        assert!(run_project(&config, &dir.path().join("x.png")).is_err());
    }

    #[test]
    fn test_gallery_rejects_bad_id() {
        let gallery = Gallery::new();
        let result = run_gallery(&gallery, &GalleryAction::Remove { id: "nope".into() });
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_lists_everything() {
        let text = catalog();
        assert!(text.contains("fractal"));
        assert!(text.contains("sunset"));
        assert!(text.contains("torus"));
    }
}

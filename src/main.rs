use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use colorramp::data::{ChannelLayout, ChannelRange, CustomRamp, NormalizationMode};
use colorramp::material::{ColormapChoice, Interpolation, JsonBackend, ShadingBackend};
use colorramp::scene::Scene;
use colorramp::{ShaderGenerator, Settings};

#[derive(Parser)]
#[command(name = "colorramp", about = "Resample scientific colormaps into fixed shading ramps")]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Extra colormap descriptions merged over the stock ones, files or directories of `*.json`
    #[arg(long = "import", global = true)]
    imports: Vec<PathBuf>,

    /// Custom ramp file, selected with the colormap name "Custom"
    #[arg(long, global = true)]
    custom: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available colormaps
    List,
    /// Print the resampled ramp of a colormap
    Resample { colormap: String },
    /// Print the material description for a colormap, measuring a JSON array of values
    Material {
        colormap: String,
        /// JSON file with either numbers or [x, y, z] triples
        #[arg(long)]
        values: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,
        #[arg(long)]
        per_channel: bool,
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
        range: Option<Vec<f32>>,
        #[arg(long, value_enum)]
        interpolation: Option<InterpolationArg>,
    },
    /// Write a PNG strip of the resampled ramp
    Preview { colormap: String, output: PathBuf },
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum ModeArg {
    Auto,
    Global,
    None,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum InterpolationArg {
    Constant,
    Linear,
    Ease,
    Cardinal,
    BSpline,
}

impl From<ModeArg> for NormalizationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => NormalizationMode::Auto,
            ModeArg::Global => NormalizationMode::Global,
            ModeArg::None => NormalizationMode::None,
        }
    }
}

impl From<InterpolationArg> for Interpolation {
    fn from(i: InterpolationArg) -> Self {
        match i {
            InterpolationArg::Constant => Interpolation::Constant,
            InterpolationArg::Linear => Interpolation::Linear,
            InterpolationArg::Ease => Interpolation::Ease,
            InterpolationArg::Cardinal => Interpolation::Cardinal,
            InterpolationArg::BSpline => Interpolation::BSpline,
        }
    }
}

fn choice(name: &str) -> ColormapChoice {
    if name.eq_ignore_ascii_case("custom") {
        ColormapChoice::Custom
    } else {
        ColormapChoice::Named(name.to_owned())
    }
}

/// Values file as a one-object scene.
fn load_scene(path: &Path, attribute: &str) -> anyhow::Result<Scene> {
    let text = colorramp::resources::load_string(path)?;
    let mut scene = Scene::new();
    let object = scene.register_mesh("values".into());
    if let Ok(scalars) = serde_json::from_str::<Vec<f32>>(&text) {
        object.add_scalar(attribute.into(), scalars);
    } else {
        let vectors: Vec<[f32; 3]> = serde_json::from_str(&text)
            .with_context(|| format!("{} holds neither numbers nor triples", path.display()))?;
        object.add_vector(attribute.into(), vectors);
    }
    Ok(scene)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Couldn't load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let mut generator = ShaderGenerator::new(settings);
    for path in &cli.imports {
        let files = if path.is_dir() {
            colorramp::resources::catalog_files(path)?
        } else {
            vec![path.clone()]
        };
        for file in files {
            let report = generator.import_colormaps_reported(&file);
            eprintln!("{}", report.message());
        }
    }
    if let Some(path) = &cli.custom {
        *generator.custom_ramp_mut() = CustomRamp::load(path)?;
    }

    match cli.command {
        Command::List => {
            for name in generator.colormap_names() {
                println!("{}", name);
            }
        }
        Command::Resample { colormap } => {
            let ramp = generator.ramp_for(&choice(&colormap))?;
            println!("{}", serde_json::to_string_pretty(&ramp.to_rgba_stops())?);
        }
        Command::Material {
            colormap,
            values,
            mode,
            per_channel,
            range,
            interpolation,
        } => {
            let mut request = generator.default_request();
            request.colormap = choice(&colormap);
            request.mode = mode.into();
            if per_channel {
                request.layout = ChannelLayout::PerChannel;
            }
            if let Some(range) = range {
                request.fixed_range = ChannelRange::new(range[0], range[1]);
            }
            if let Some(interpolation) = interpolation {
                request.interpolation = interpolation.into();
            }
            let scene = match &values {
                Some(path) => {
                    request.object = Some("values".into());
                    load_scene(path, &request.attribute)?
                }
                None => Scene::new(),
            };
            let material = generator.create_scene_material(&request, &scene)?;
            println!("{}", JsonBackend { pretty: true }.build(&material)?);
        }
        Command::Preview { colormap, output } => {
            let ramp = generator.ramp_for(&choice(&colormap))?;
            let settings = generator.settings();
            colorramp::preview::save_ramp_png(
                &ramp,
                &output,
                settings.preview_width,
                settings.preview_height,
            )?;
        }
    }
    Ok(())
}

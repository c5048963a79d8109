//! Turns the buildings in an OpenStreetMap extract into solids that can be extruded straight up,
//! expressed in meters around a local origin.

#[macro_use]
extern crate log;

mod geojson_out;
mod model;

use anyhow::Result;
use structopt::StructOpt;

use convert_osm::Options;
use osmutil::{prettyprint_usize, Timer};

#[derive(StructOpt)]
#[structopt(name = "osm2solid", about = "Turns OSM buildings into extrusion-ready solids")]
enum Command {
    /// Resolves every building in an .osm file and writes an extrusion model as JSON
    Convert {
        /// The path to an .osm XML file
        #[structopt()]
        input: String,
        /// The path to write the model
        #[structopt(long)]
        output: String,
        /// Also write the building footprints, in WGS84, as GeoJSON to this path
        #[structopt(long)]
        geojson: Option<String>,
        /// Read the height options from this JSON file instead of the flags
        #[structopt(long)]
        config: Option<String>,
        #[structopt(flatten)]
        opts: Options,
    },
    /// Prints the resolved buildings, before projection, as JSON
    DumpFeatures {
        /// The path to an .osm XML file
        #[structopt()]
        input: String,
        /// Read the height options from this JSON file instead of the flags
        #[structopt(long)]
        config: Option<String>,
        #[structopt(flatten)]
        opts: Options,
    },
}

fn main() -> Result<()> {
    osmutil::logger::setup();

    match Command::from_args() {
        Command::Convert {
            input,
            output,
            geojson,
            config,
            opts,
        } => convert(input, output, geojson, load_options(config, opts)?)?,
        Command::DumpFeatures {
            input,
            config,
            opts,
        } => dump_features(input, load_options(config, opts)?)?,
    }
    Ok(())
}

/// A config file replaces the flags entirely. Anything it doesn't mention gets the usual default.
fn load_options(config: Option<String>, opts: Options) -> Result<Options> {
    let opts = match config {
        Some(path) => osmutil::read_json::<Options>(&path)?,
        None => opts,
    };
    opts.validate()?;
    Ok(opts)
}

fn convert(input: String, output: String, geojson: Option<String>, opts: Options) -> Result<()> {
    let mut timer = Timer::new(format!("convert {}", input));
    let doc = convert_osm::reader::read(&input, &mut timer)?;
    let conversion = convert_osm::convert(&doc, &opts, &mut timer)?;

    let model = model::Model::build(&conversion, &mut timer);
    if model.solids.len() < conversion.projected.len() {
        warn!(
            "Only {} of {} buildings became solids",
            prettyprint_usize(model.solids.len()),
            prettyprint_usize(conversion.projected.len())
        );
    }
    osmutil::write_json(&output, &model)?;
    info!(
        "Wrote {} solids to {}",
        prettyprint_usize(model.solids.len()),
        output
    );

    if let Some(path) = geojson {
        geojson_out::write(&path, &conversion.features)?;
        info!("Wrote footprints to {}", path);
    }
    Ok(())
}

fn dump_features(input: String, opts: Options) -> Result<()> {
    let mut timer = Timer::new(format!("dump features of {}", input));
    let doc = convert_osm::reader::read(&input, &mut timer)?;
    let conversion = convert_osm::convert(&doc, &opts, &mut timer)?;
    println!("{}", osmutil::to_json(&conversion.features));
    Ok(())
}

//! `Cadascan` CLI — recognize map features and lettering in cadastre SVG
//! exports and print a per-document report.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use cadascan_path::{BoundingBox, Scalar};
use cadascan_recognize::{
    Dispatcher, DocumentScanner, FeatureRecognizer, GlyphDatabase, HousenumberRecognizer,
    NameRecognizer, RecognizedText,
};
use cadascan_svg::{read_document_paths, read_glyph_library};

#[derive(Parser)]
#[command(version, about = "Cadascan \u{2014} cadastre drawing recognition")]
struct Cli {
    /// Input SVG documents, processed in order
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Target bounding box "x1,y1,x2,y2" the drawing maps onto
    #[arg(long = "target-bbox", value_name = "X1,Y1,X2,Y2", value_parser = parse_bbox)]
    target_bbox: BoundingBox,

    /// Directory with the reference glyph libraries streets.svg,
    /// places.svg and housenumbers.svg. Without it only map features are
    /// recognized.
    #[arg(long = "glyphs", value_name = "DIR")]
    glyphs: Option<PathBuf>,
}

fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let values: Vec<Scalar> = s
        .split(',')
        .map(|v| v.trim().parse::<Scalar>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid coordinate in {s:?}: {e}"))?;
    let &[x1, y1, x2, y2] = &values[..] else {
        return Err(format!("expected four coordinates, got {}", values.len()));
    };
    Ok(BoundingBox::new(x1, y1, x2, y2))
}

/// The shared glyph databases, built once and reused for every document.
struct GlyphDatabases {
    streets: Arc<GlyphDatabase>,
    places: Arc<GlyphDatabase>,
    housenumbers: Arc<GlyphDatabase>,
}

fn load_databases(dir: &Path) -> Result<GlyphDatabases, String> {
    let load = |file: &str| {
        read_glyph_library(&dir.join(file)).map_err(|e| format!("cannot load {file}: {e}"))
    };
    let name_params = NameRecognizer::name_match_params();
    let build = |glyphs, params: &cadascan_path::MatchParams| {
        GlyphDatabase::build(glyphs, params, 5.0).map_err(|e| e.to_string())
    };
    Ok(GlyphDatabases {
        streets: Arc::new(build(load("streets.svg")?, &name_params)?),
        places: Arc::new(build(load("places.svg")?, &name_params)?),
        housenumbers: Arc::new(build(
            load("housenumbers.svg")?,
            &HousenumberRecognizer::match_params(),
        )?),
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let databases = match cli.glyphs.as_deref().map(load_databases) {
        Some(Ok(databases)) => Some(databases),
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        None => None,
    };

    let mut failed = false;
    for document in &cli.documents {
        if let Err(e) = process_document(document, cli.target_bbox, databases.as_ref()) {
            eprintln!("Error: {}: {e}", document.display());
            failed = true;
        }
    }
    if failed {
        process::exit(1);
    }
}

fn process_document(
    document: &Path,
    target_bbox: BoundingBox,
    databases: Option<&GlyphDatabases>,
) -> Result<(), String> {
    let paths = read_document_paths(document).map_err(|e| e.to_string())?;

    let mut features = FeatureRecognizer::all();
    let mut texts = databases.map(|db| {
        (
            HousenumberRecognizer::new(Arc::clone(&db.housenumbers)),
            NameRecognizer::new(Arc::clone(&db.streets), Arc::clone(&db.places)),
        )
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&mut features);
    if let Some((numbers, names)) = &mut texts {
        dispatcher.register(numbers);
        dispatcher.register(names);
    }

    let mut scanner = DocumentScanner::new(target_bbox, dispatcher);
    for path in &paths {
        scanner.offer(path);
    }
    if scanner.transform().is_none() {
        return Err("no background rectangle found; cannot georeference".to_owned());
    }
    let unclaimed = scanner.unclaimed();
    drop(scanner);

    println!("{}:", document.display());
    report_features(&features);
    if let Some((numbers, names)) = &texts {
        report_texts("place names", names.place_names());
        report_texts("street names", names.street_names());
        report_texts("small names", names.small_names());
        report_texts("house numbers", numbers.numbers());
    }
    println!("  unclaimed paths: {unclaimed}");
    Ok(())
}

fn report_features(features: &FeatureRecognizer) {
    use cadascan_recognize::FeatureCategory::{
        Building, LightBuilding, Limit, Parcel, Riverbank, Water,
    };
    for category in [Parcel, Building, LightBuilding, Water, Riverbank, Limit] {
        let groups = features.rings(category);
        if !groups.is_empty() {
            println!("  {category}: {} ring groups", groups.len());
        }
    }
}

fn report_texts(heading: &str, texts: &[RecognizedText]) {
    if texts.is_empty() {
        return;
    }
    println!("  {heading}:");
    for text in texts {
        // The residual marker flags partially recognized labels for
        // manual review.
        let marker = if text.complete { "" } else { "???" };
        println!(
            "    {:?} at ({:.1}, {:.1}), {:.0}\u{b0}{}",
            format!("{}{marker}", text.text),
            text.position.x,
            text.position.y,
            text.angle.to_degrees(),
            if text.complete { "" } else { " (incomplete)" },
        );
    }
}

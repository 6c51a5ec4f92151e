use anyhow::{bail, Context};
use evzoom_core::{
    source, DataSource, Renderer, Session, Viewer, ViewerConfig, ViewerEvent, VisualRequest,
    ZoomData,
};
use evzoom_svg::Scene;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Applies requests to the scene and keeps a copy of each one.
struct Traced {
    scene: Scene,
    trace: Vec<VisualRequest>,
}

impl Renderer for Traced {
    fn apply(&mut self, requests: &[VisualRequest]) {
        self.scene.apply(requests);
        self.trace.apply(requests);
    }

    fn reset(&mut self, data: &ZoomData, config: &ViewerConfig) {
        self.scene.reset(data, config);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

fn write_scene(output: &Path, scene: &Scene) -> anyhow::Result<()> {
    evzoom_svg::save(output, scene).with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {} elements to {}", scene.len(), output.display());
    Ok(())
}

pub fn render(
    data: Option<&str>,
    attribute: Option<&str>,
    query: Option<&str>,
    output: &Path,
    config: Option<&Path>,
    hover: Option<(f64, f64)>,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let Some(source) = source::resolve(data, attribute, query) else {
        bail!("no data source: pass --data, --attribute or --query");
    };
    let data = source::load(source.location())
        .with_context(|| format!("loading couplings from {}", source))?;

    let viewer = Viewer::new(data, config);
    let times = &viewer.config().times;
    let period = times.global_tick.max(1) as u64;
    let load_ticks = times.load_time(viewer.data().len()) / period + 1;
    let dwell_ticks = times.matched_time_threshold as u64 / period + 1;
    let scene = Scene::from_viewer(&viewer);
    let mut session = Session::new(viewer, scene);

    if let Some((x, y)) = hover {
        // the pointer is ignored until the viewer is ready
        for _ in 0..load_ticks {
            let _ = session.handle(ViewerEvent::Tick);
        }
        let _ = session.handle(ViewerEvent::PointerMove { x, y });
        for _ in 0..dwell_ticks {
            let _ = session.handle(ViewerEvent::Tick);
        }
        info!("hovered ({}, {}): {:?}", x, y, session.viewer().mode());
    }
    write_scene(output, session.renderer())
}

pub fn replay(
    data: &str,
    events: &Path,
    output: &Path,
    config: Option<&Path>,
    trace: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let source = DataSource::Explicit(data.to_string());
    let data = source::load(source.location())
        .with_context(|| format!("loading couplings from {}", source))?;

    let file = File::open(events).with_context(|| format!("opening {}", events.display()))?;
    let script: Vec<ViewerEvent> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing events in {}", events.display()))?;

    let viewer = Viewer::new(data, config);
    let renderer = Traced {
        scene: Scene::from_viewer(&viewer),
        trace: vec![],
    };
    let mut session = Session::new(viewer, renderer);
    let sender = session.sender();
    for event in script {
        sender.send(event);
    }
    let _ = session.run_pending();
    info!(
        "replayed {} events, final mode {:?}",
        session.handled(),
        session.viewer().mode()
    );

    let Traced { scene, trace: requests } = session.into_renderer();
    if let Some(path) = trace {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &requests)?;
        info!("wrote {} requests to {}", requests.len(), path.display());
    }
    write_scene(output, &scene)
}

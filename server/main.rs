use actix_files::Files;
use actix_web::{get, middleware, post, web, App, HttpResponse, HttpServer, Responder};
use ordering_graph::export::{EdgeRequest, ViewerDocument};
use ordering_graph::import::{load_infrastructure, load_timetable};
use ordering_graph::{
    build_ordering_graph, generate_graph, BuildOptions, GeneratorParams, OrderingBuild, OrderingError,
};
use petgraph::algo::is_cyclic_directed;
use serde::Serialize;
use std::env;
use std::sync::RwLock;

/// Graph currently served; inverting an edge replaces it
struct AppState {
    build: RwLock<OrderingBuild>,
}

#[derive(Serialize)]
struct GraphStats {
    nodes: usize,
    edges: usize,
    trains: usize,
    structural_conflicts: usize,
    cyclic: bool,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}

fn build_options() -> BuildOptions {
    let train_edges = env::var("ORDERING_TRAIN_EDGES")
        .is_ok_and(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"));
    BuildOptions { train_edges }
}

fn generator_params() -> GeneratorParams {
    let defaults = GeneratorParams::default();
    GeneratorParams {
        trains: env_parse("ORDERING_GEN_TRAINS").unwrap_or(defaults.trains),
        tracks: env_parse("ORDERING_GEN_TRACKS").unwrap_or(defaults.tracks),
        min_nodes: env_parse("ORDERING_GEN_MIN_NODES").unwrap_or(defaults.min_nodes),
        max_nodes: env_parse("ORDERING_GEN_MAX_NODES").unwrap_or(defaults.max_nodes),
        seed: env_parse("ORDERING_GEN_SEED"),
    }
}

/// Build from CSV files if both are configured, otherwise generate a graph
fn initial_build() -> Result<OrderingBuild, OrderingError> {
    let options = build_options();
    match (env::var("ORDERING_INFRA_CSV"), env::var("ORDERING_TIMETABLE_CSV")) {
        (Ok(infra_path), Ok(timetable_path)) => {
            log::info!("Building ordering graph from {infra_path} and {timetable_path}");
            let infrastructure = load_infrastructure(&infra_path)?;
            let timetable = load_timetable(&timetable_path)?;
            build_ordering_graph(&infrastructure, &timetable, &options)
        }
        _ => {
            let params = generator_params();
            log::info!("Generating ordering graph with {params:?}");
            generate_graph(&params, &options)
        }
    }
}

fn internal_error(err: impl std::fmt::Display) -> HttpResponse {
    log::error!("{err}");
    HttpResponse::InternalServerError().body(err.to_string())
}

/// Served with and without a trailing slash; the viewer requests `/api/ordering_graph/`
async fn viewer_graph(state: web::Data<AppState>) -> impl Responder {
    match state.build.read() {
        Ok(build) => HttpResponse::Ok().json(ViewerDocument::from_graph(&build.graph)),
        Err(err) => internal_error(err),
    }
}

#[get("/api/ordering_graph/full")]
async fn full_graph(state: web::Data<AppState>) -> impl Responder {
    match state.build.read() {
        Ok(build) => HttpResponse::Ok().json(&build.graph),
        Err(err) => internal_error(err),
    }
}

#[get("/api/ordering_graph/conflicts")]
async fn conflicts(state: web::Data<AppState>) -> impl Responder {
    match state.build.read() {
        Ok(build) => HttpResponse::Ok().json(&build.conflicts),
        Err(err) => internal_error(err),
    }
}

#[get("/api/ordering_graph/stats")]
async fn stats(state: web::Data<AppState>) -> impl Responder {
    match state.build.read() {
        Ok(build) => HttpResponse::Ok().json(GraphStats {
            nodes: build.graph.len(),
            edges: build.graph.edge_count(),
            trains: build.graph.train_ids().len(),
            structural_conflicts: build.conflicts.len(),
            cyclic: is_cyclic_directed(&build.graph.to_digraph()),
        }),
        Err(err) => internal_error(err),
    }
}

#[post("/api/ordering_graph/invert")]
async fn invert(state: web::Data<AppState>, request: web::Json<EdgeRequest>) -> impl Responder {
    let Some((from, to)) = request.node_ids() else {
        return HttpResponse::BadRequest().body("edge endpoints must be node ids");
    };
    let mut build = match state.build.write() {
        Ok(build) => build,
        Err(err) => return internal_error(err),
    };
    match build.graph.with_inverted_edge(from, to) {
        Ok(graph) => {
            log::info!("Inverted edge {from} -> {to}");
            build.graph = graph;
            HttpResponse::Ok().json(ViewerDocument::from_graph(&build.graph))
        }
        Err(err) => {
            log::warn!("Rejected edge inversion: {err}");
            HttpResponse::BadRequest().body(err.to_string())
        }
    }
}

fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/api/ordering_graph", "/api/ordering_graph/"]).route(web::get().to(viewer_graph)),
    )
    .service(full_graph)
    .service(conflicts)
    .service(stats)
    .service(invert);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get port from environment or default to 8080
    let port = env_parse::<u16>("PORT").unwrap_or(8080);

    let build = initial_build().map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    log::info!(
        "Serving ordering graph with {} nodes, {} edges and {} structural conflicts",
        build.graph.len(),
        build.graph.edge_count(),
        build.conflicts.len()
    );
    let state = web::Data::new(AppState { build: RwLock::new(build) });

    log::info!("Starting server on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(api_routes)
            .service(Files::new("/", "./dist").index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

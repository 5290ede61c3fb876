use log::LevelFilter;
use std::time::{Duration, Instant};
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

mod camera;
mod render;

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bear.obj".to_string());
    // position-indexed path; texcoords (if the file has any) stay unused
    let mesh = objmesh::load_indexed(&path)?;
    log::info!(
        "{}: {} vertices, {} triangles",
        path,
        mesh.vertex_positions.len() / 3,
        mesh.indices.len() / 3
    );

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Obj File Viewer")
        .with_resizable(true)
        .build(&event_loop)
        .unwrap();
    let mut cam = camera::OrbitCamera::create(
        nalgebra::Point3::new(0.0, 3.0, 8.0),
        nalgebra::Point3::origin(),
    );
    let mut render_state = render::RenderState::create(&window, &mesh);

    // 60 fps
    const DUR: Duration = Duration::from_micros(16667);
    event_loop.run(move |event, _eloop, control_flow| match event {
        Event::NewEvents(StartCause::Init) => {
            *control_flow = ControlFlow::WaitUntil(Instant::now() + DUR)
        }
        Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
            *control_flow = ControlFlow::WaitUntil(Instant::now() + DUR);
            cam.update();
            render_state.projview = render_state.proj * cam.matrix();
            render_state.render();
        }
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::Resized(size) => {
                log::debug!("Resizing to {:?}", size);
                render_state.resize(size.into());
            }
            _ => {}
        },
        Event::LoopDestroyed => {
            log::info!("Closing time!");
        }
        _ => {}
    })
}

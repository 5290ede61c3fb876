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
    let mut args = std::env::args().skip(1);
    let model_path = args.next().unwrap_or_else(|| "bear.obj".to_string());
    let texture_path = args.next().unwrap_or_else(|| "bear.tga".to_string());

    let source = objmesh::load_source(&model_path)?;
    // texcoords drive a second index stream here, so the mesh gets split
    // into non-indexed parallel arrays
    let mesh = objmesh::RenderMesh::build(&source)?;
    let texture = image::open(&texture_path)
        .map_err(|e| anyhow::anyhow!("reading texture {}: {}", texture_path, e))?
        .to_rgba8();

    // a floor centered under the model, sized off its footprint
    let (min, max) = source.bounds();
    let [mid_x, bottom_y, mid_z] = source.mid_bottom();
    let half = (max[0] - min[0]).max(max[2] - min[2]).max(1.0);
    #[rustfmt::skip]
    let floor_positions = [
        mid_x - half, bottom_y, mid_z - half,
        mid_x + half, bottom_y, mid_z - half,
        mid_x + half, bottom_y, mid_z + half,
        mid_x - half, bottom_y, mid_z - half,
        mid_x + half, bottom_y, mid_z + half,
        mid_x - half, bottom_y, mid_z + half,
    ];
    #[rustfmt::skip]
    let floor_tex_coords = [
        0.0, 0.0,  1.0, 0.0,  1.0, 1.0,
        0.0, 0.0,  1.0, 1.0,  0.0, 1.0,
    ];

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Textured Model")
        .with_resizable(true)
        .build(&event_loop)
        .unwrap();
    let center = nalgebra::Point3::new(
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    );
    let reach = 2.5 * (max[1] - min[1]).max(half);
    let mut cam = camera::OrbitCamera::create(
        center + nalgebra::Vector3::new(0.0, 0.6 * reach, reach),
        center,
    );
    let mut render_state = render::RenderState::create(
        &window,
        &mesh,
        &floor_positions,
        &floor_tex_coords,
        &texture,
    );

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

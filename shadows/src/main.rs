use log::LevelFilter;
use nalgebra::Vector3;
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
    let mesh = objmesh::RenderMesh::build(&source)?;
    let texture = image::open(&texture_path)
        .map_err(|e| anyhow::anyhow!("reading texture {}: {}", texture_path, e))?
        .to_rgba8();

    let (min, max) = source.bounds();
    let mid_bottom = source.mid_bottom();
    let [mid_x, bottom_y, mid_z] = mid_bottom;
    let reach = (max[0] - min[0])
        .max(max[1] - min[1])
        .max(max[2] - min[2])
        .max(1.0);
    // the floor that catches the shadow, well past the model's footprint
    let half = 1.5 * reach;
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

    let center = nalgebra::Point3::new(
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    );
    let viewpoints = camera::Viewpoints {
        eye: center + Vector3::new(-0.65, 0.4, 0.65) * 2.0 * reach,
        light: center + Vector3::new(1.0, 0.8, 0.2) * 2.0 * reach,
        target: center,
    };
    let light_proj = camera::light_proj(2.0 * half);
    let mut spin = camera::Spin::create();

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Shadow Rendering")
        .with_resizable(true)
        .build(&event_loop)
        .unwrap();
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
            spin.update();
            let model_mat = spin.matrix(mid_bottom);
            let eye_view = viewpoints.eye_view();
            let light_view = viewpoints.light_view();
            // the floor never moves, so its model matrix stays identity
            let mats = render::FrameMatrices {
                model_mvp: render_state.proj * eye_view * model_mat,
                model_light_mvp: light_proj * light_view * model_mat,
                floor_mvp: render_state.proj * eye_view,
                floor_light_mvp: light_proj * light_view,
            };
            render_state.render(&mats);
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

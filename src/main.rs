use winit::{
    event::{
        Event,
        WindowEvent,
    },
    event_loop::ControlFlow,
};
use bui::renderer;
use std::{
    thread,
    time::{
        Duration,
        Instant,
    },
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use starfall::*;

const FRAME_TIME: Duration = Duration::from_micros(1_000_000/60);

type SkyRef<'a> = &'a mut Sky;
type SkyCanvasRef<'a> = &'a mut SkyCanvas;
constrainer::create_constrainer!(Viewport {
    dynamic resx f32
    dynamic resy f32
    external sky SkyRef
    external canvas SkyCanvasRef

    listener reshape_sky (resx, resy, sky, canvas) {
        info!(resx, resy, "Viewport resized");
        canvas.resize(resx, resy);
        sky.resize(resx, resy);
    }

    opgenset (resx, resy)
});

fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = if let Some(path) = std::env::args().nth(1) {
        info!(%path, "Loading sky config");
        SkyConfig::load(&path)?
    } else {
        info!("No config given, using the dusk sky");
        SkyConfig::default()
    };

    let event_loop = winit::event_loop::EventLoop::new();
    let window = winit::window::WindowBuilder::new()
        .with_title("Starfall")
        .build(&event_loop)?;
    let mut renderer = futures::executor::block_on(renderer::Renderer::new(&window));

    let size = window.inner_size();
    let (resx, resy) = (size.width as f32, size.height as f32);
    let mut canvas = SkyCanvas::new(renderer.device(), renderer.config().format, resx, resy);
    let mut sky = Sky::new(config, resx, resy);
    let mut viewport = Viewport::new(resx, resy, &mut sky, &mut canvas);

    let mut last_frame_time = Instant::now();
    window.request_redraw();
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit
            },
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                match event {
                    WindowEvent::Resized(physical_size) => {
                        renderer.resize(*physical_size);
                        viewport.set_resx_resy(
                            physical_size.width as f32,
                            physical_size.height as f32,
                            &mut sky,
                            &mut canvas,
                        )
                    },
                    WindowEvent::ScaleFactorChanged {
                        new_inner_size,
                        ..
                    } => {
                        renderer.resize(**new_inner_size);
                        viewport.set_resx_resy(
                            new_inner_size.width as f32,
                            new_inner_size.height as f32,
                            &mut sky,
                            &mut canvas,
                        )
                    },
                    _ => {}
                }
            },
            Event::RedrawRequested(_) => {
                match renderer.surface().get_current_texture() {
                    Ok(surface_texture) => {
                        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
                        let mut encoder = renderer.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Sky encoder"),
                        });
                        sky.tick(&mut canvas, &window);
                        canvas.render(renderer.device(), &mut encoder, &view);
                        renderer.queue().submit(std::iter::once(encoder.finish()));
                        surface_texture.present();
                    },
                    Err(wgpu::SurfaceError::Lost) => {
                        warn!("Surface lost, reconfiguring");
                        renderer.reconfigure();
                        window.request_redraw();
                    },
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("Out of GPU memory");
                        *control_flow = ControlFlow::Exit;
                    },
                    Err(e) => {
                        warn!("Skipping frame: {:?}", e);
                        window.request_redraw();
                    },
                };
                thread::sleep(FRAME_TIME.saturating_sub(last_frame_time.elapsed()));
                last_frame_time = Instant::now();
            },
            _ => ()
        }
    });
}

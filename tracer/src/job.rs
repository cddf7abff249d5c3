use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use geo::pixelbuffer::PixelBuffer;
use geo::Vec3;

use crate::error::{Error, Result};
use crate::pathtracer;
use crate::scene::Scene;
use crate::settings::RenderSettings;

/// How often the dispatcher thread checks whether every stripe has been
/// claimed, while the worker pool is still running.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A horizontal band of rows `[y0, y1)` spanning the full image width: the
/// unit of work handed to a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StripeTask {
    x0: u32,
    x1: u32,
    y0: u32,
    y1: u32,
}

impl StripeTask {
    fn pixel_count(&self) -> u64 {
        u64::from(self.x1 - self.x0) * u64::from(self.y1 - self.y0)
    }
}

/// Split the image into `stripe_height`-row bands. Stripes are generated
/// top-to-bottom and then reversed, so popping from the back of the
/// returned stack yields the top-of-image stripe first: if the pool ever
/// stops early, whatever is left unclaimed on the stack is the bottom of
/// the image, not the top.
fn make_stripes(width: u32, height: u32, stripe_height: u32) -> Vec<StripeTask> {
    let mut stripes = Vec::new();
    let mut y = 0;

    while y < height {
        let y1 = (y + stripe_height).min(height);
        stripes.push(StripeTask {
            x0: 0,
            x1: width,
            y0: y,
            y1,
        });
        y = y1;
    }

    stripes.reverse();
    stripes
}

/// A raw-pointer view over a `PixelBuffer`'s backing storage, shared across
/// worker threads without per-pixel locking. Sound only because `RenderJob`
/// hands out disjoint row ranges: no two stripes ever cover the same pixel,
/// so concurrent writes through this type never race.
struct SyncPixelBuffer {
    ptr: *mut Vec3,
    width: u32,
    height: u32,
}

unsafe impl Sync for SyncPixelBuffer {}

impl SyncPixelBuffer {
    fn new(buffer: &mut PixelBuffer) -> Self {
        SyncPixelBuffer {
            width: buffer.width(),
            height: buffer.height(),
            ptr: buffer.pixels_mut().as_mut_ptr(),
        }
    }

    /// Write `c` at `(x, y)`.
    ///
    /// Safety: the caller must guarantee that no other thread writes to
    /// `(x, y)` for the lifetime of this buffer, and that `(x, y)` is in
    /// bounds. `render_stripe` upholds both by construction.
    unsafe fn write(&self, x: u32, y: u32, c: Vec3) {
        debug_assert!(x < self.width && y < self.height);
        let index = (y as usize) * (self.width as usize) + (x as usize);
        *self.ptr.add(index) = c;
    }
}

/// Mix a root seed with pixel coordinates into a per-pixel RNG seed, so the
/// image a render produces doesn't depend on how many threads rendered it
/// or in what order stripes were dispatched. A splitmix64-style finalizer.
fn pixel_seed(root_seed: u64, x: u32, y: u32) -> u64 {
    let mut z = root_seed
        .wrapping_add(u64::from(x).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(u64::from(y).wrapping_mul(0xC2B2_AE3D_27D4_EB4F));

    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Average `settings.samples` independent radiance estimates for pixel
/// `(x, y)`, reseeding a fresh RNG stream from `(settings.seed, x, y)` so
/// the result is reproducible regardless of dispatch order.
fn render_pixel(x: u32, y: u32, scene: &Scene, settings: &RenderSettings) -> Vec3 {
    let mut rng = XorShiftRng::seed_from_u64(pixel_seed(settings.seed, x, y));

    let sum: Vec3 = (0..settings.samples)
        .map(|_| {
            let ray = if settings.samples == 1 {
                scene.camera.primary_ray(x, y)
            } else {
                scene.camera.jittered_ray(x, y, &mut rng)
            };
            pathtracer::compute_color(&ray, scene, 0, settings.max_bounces, &mut rng)
        })
        .sum();

    sum / f64::from(settings.samples)
}

fn render_stripe(task: &StripeTask, scene: &Scene, settings: &RenderSettings, buffer: &SyncPixelBuffer) {
    for y in task.y0..task.y1 {
        for x in task.x0..task.x1 {
            let color = render_pixel(x, y, scene, settings);
            // Safety: stripes partition the image into disjoint row
            // ranges, and this call owns `[y0, y1)` for its whole duration.
            unsafe { buffer.write(x, y, color) };
        }
    }
}

/// Bookkeeping mutated as stripes complete: how many are done, how many
/// pixels that represents, and the first error a worker hit, if any.
struct DoneState {
    tasks_done: usize,
    pixels_done: u64,
    error: Option<Error>,
}

/// Shared dispatcher state: a LIFO stack of remaining stripes plus progress
/// and error bookkeeping. Workers only ever touch this through `acquire`
/// and `notify_done`, both of which take `&self` and lock internally.
struct RenderJob {
    tasks: Mutex<Vec<StripeTask>>,
    tasks_total: usize,
    total_pixels: u64,
    done: Mutex<DoneState>,
    finished: AtomicBool,
}

impl RenderJob {
    fn new(stripes: Vec<StripeTask>) -> Self {
        let tasks_total = stripes.len();
        let total_pixels = stripes.iter().map(StripeTask::pixel_count).sum();

        RenderJob {
            tasks: Mutex::new(stripes),
            tasks_total,
            total_pixels,
            done: Mutex::new(DoneState {
                tasks_done: 0,
                pixels_done: 0,
                error: None,
            }),
            finished: AtomicBool::new(tasks_total == 0),
        }
    }

    fn acquire(&self) -> Option<StripeTask> {
        self.tasks.lock().unwrap().pop()
    }

    /// Record the outcome of one stripe. Only the first error observed is
    /// kept; later ones are logged and dropped, since one failure is enough
    /// to fail the whole render.
    fn notify_done(&self, task: &StripeTask, outcome: std::result::Result<(), Error>) {
        let mut done = self.done.lock().unwrap();

        done.tasks_done += 1;
        done.pixels_done += task.pixel_count();

        match outcome {
            Ok(()) => {
                let pct = 100.0 * (done.pixels_done as f64) / (self.total_pixels.max(1) as f64);
                log::debug!(
                    "progress: {:.1}% ({}/{} stripes)",
                    pct,
                    done.tasks_done,
                    self.tasks_total
                );
            }
            Err(e) => {
                log::error!(
                    "stripe [{}, {}) x [{}, {}) failed: {}",
                    task.x0, task.x1, task.y0, task.y1, e
                );
                if done.error.is_none() {
                    done.error = Some(e);
                }
            }
        }

        if done.tasks_done == self.tasks_total {
            self.finished.store(true, Ordering::Release);
        }
    }

    fn take_error(&self) -> Option<Error> {
        self.done.lock().unwrap().error.take()
    }
}

/// A single worker's loop: claim stripes until the stack is empty or
/// `running` is cleared, catching any panic so one bad pixel doesn't take
/// down the whole pool.
fn worker_loop(running: &AtomicBool, job: &RenderJob, scene: &Scene, settings: &RenderSettings, buffer: &SyncPixelBuffer) {
    while running.load(Ordering::Acquire) {
        let task = match job.acquire() {
            Some(task) => task,
            None => break,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            render_stripe(&task, scene, settings, buffer);
        }))
        .map_err(|payload| Error::Worker(panic_message(&payload)));

        job.notify_done(&task, outcome);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker thread panicked with a non-string payload".to_string()
    }
}

/// Render `scene` into a fresh `PixelBuffer` according to `settings`,
/// dispatching stripes across `settings.thread_count` worker threads
/// (clamped to the host's available parallelism).
pub fn render(scene: &Scene, settings: &RenderSettings) -> Result<PixelBuffer> {
    settings.validate()?;
    scene.camera.validate()?;

    let mut buffer = PixelBuffer::new(settings.width, settings.height);
    let stripes = make_stripes(settings.width, settings.height, settings.stripe_height);

    let available = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let thread_count = settings.thread_count.min(available).max(1);

    log::info!(
        "rendering {}x{} at {} spp, {} max bounces across {} stripes on {} threads",
        settings.width,
        settings.height,
        settings.samples,
        settings.max_bounces,
        stripes.len(),
        thread_count,
    );

    let job = RenderJob::new(stripes);
    let running = AtomicBool::new(true);
    let sync_buffer = SyncPixelBuffer::new(&mut buffer);

    thread::scope(|s| {
        for _ in 0..thread_count {
            s.spawn(|| worker_loop(&running, &job, scene, settings, &sync_buffer));
        }

        while !job.finished.load(Ordering::Acquire) {
            thread::sleep(POLL_INTERVAL);
        }
        running.store(false, Ordering::Release);
    });

    match job.take_error() {
        Some(e) => Err(e),
        None => {
            log::info!("render finished, {} stripes completed", job.tasks_total);
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, Fov};
    use crate::settings::ToneMapOp;
    use geo::Transform;

    fn small_scene() -> Scene {
        let camera = Camera::new(6, 4, Transform::identity(), Fov::Vertical(90.0));
        Scene::new(camera)
    }

    fn small_settings(thread_count: usize) -> RenderSettings {
        RenderSettings {
            width: 6,
            height: 4,
            samples: 2,
            max_bounces: 2,
            thread_count,
            stripe_height: 1,
            seed: 42,
            tone_map: ToneMapOp::None,
            gamma: 2.2,
        }
    }

    #[test]
    fn test_make_stripes_covers_every_row_once() {
        let stripes = make_stripes(10, 7, 3);
        let mut rows: Vec<u32> = stripes.iter().flat_map(|t| t.y0..t.y1).collect();
        rows.sort_unstable();

        assert_eq!(rows, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_make_stripes_pops_top_of_image_first() {
        let stripes = make_stripes(4, 10, 2);
        let top = *stripes.last().unwrap();

        assert_eq!(top.y0, 0);
    }

    #[test]
    fn test_pixel_seed_is_deterministic_and_position_dependent() {
        assert_eq!(pixel_seed(1, 2, 3), pixel_seed(1, 2, 3));
        assert_ne!(pixel_seed(1, 2, 3), pixel_seed(1, 3, 2));
    }

    #[test]
    fn test_render_is_invariant_to_thread_count() {
        let scene = small_scene();

        let single = render(&scene, &small_settings(1)).unwrap();
        let multi = render(&scene, &small_settings(3)).unwrap();

        assert_eq!(single.pixels(), multi.pixels());
    }

    #[test]
    fn test_render_rejects_invalid_settings() {
        let scene = small_scene();
        let mut settings = small_settings(1);
        settings.width = 0;

        assert!(render(&scene, &settings).is_err());
    }
}

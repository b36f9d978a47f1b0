// src/painter/tests.rs

use super::*;
use crate::color::Color;
use crate::config::FigureConfig;
use crate::surface::{Point, Rect, Size, Surface, SurfaceFactory, CANVAS_SIZE};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// --- Recording surface ---

#[derive(Debug)]
struct RecordingSurface {
    id: usize,
    size: Size,
    fills: Vec<(Rect, Color)>,
}

impl Surface for RecordingSurface {
    fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        self.fills.push((rect, color));
    }
}

fn surface() -> RecordingSurface {
    RecordingSurface {
        id: 0,
        size: CANVAS_SIZE,
        fills: Vec::new(),
    }
}

#[derive(Default)]
struct RecordingFactory {
    allocated: Mutex<Vec<Size>>,
}

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn new_surface(&self, size: Size) -> Result<RecordingSurface> {
        let mut allocated = self.allocated.lock().unwrap();
        allocated.push(size);
        Ok(RecordingSurface {
            id: allocated.len() - 1,
            size,
            fills: Vec::new(),
        })
    }
}

struct FailingFactory;

impl SurfaceFactory for FailingFactory {
    type Surface = RecordingSurface;

    fn new_surface(&self, _size: Size) -> Result<RecordingSurface> {
        anyhow::bail!("no video memory")
    }
}

/// Published frame: (surface id, number of fills on it at publish time).
type Published = (usize, usize);

fn start_recording_loop() -> (PaintLoop, mpsc::Receiver<Published>) {
    let (tx, rx) = mpsc::channel();
    let factory = RecordingFactory::default();
    let paint_loop = PaintLoop::start(&factory, move |frame: &RecordingSurface| {
        tx.send((frame.id, frame.fills.len())).unwrap();
    })
    .unwrap();
    (paint_loop, rx)
}

fn counting_task(counter: &Arc<AtomicUsize>) -> Operation {
    let counter = Arc::clone(counter);
    Operation::task(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

// --- Operation tests ---

#[test_log::test]
fn test_fill_covers_bounds_and_is_not_ready() {
    let mut s = surface();
    assert!(!Operation::Fill(Color::GREEN).apply(&mut s));
    assert_eq!(s.fills, vec![(Rect::new(0, 0, 800, 800), Color::GREEN)]);
}

#[test_log::test]
fn test_rect_fill_uses_given_rect() {
    let mut s = surface();
    let op = Operation::RectFill {
        rect: Rect::new(10, 20, 30, 40),
        color: Color::BLACK,
    };
    assert!(!op.apply(&mut s));
    assert_eq!(s.fills, vec![(Rect::new(10, 20, 30, 40), Color::BLACK)]);
}

#[test_log::test]
fn test_ready_marker_is_ready_and_draws_nothing() {
    let mut s = surface();
    assert!(Operation::Ready.apply(&mut s));
    assert!(s.fills.is_empty());
}

#[test_log::test]
fn test_list_readiness_is_or_of_children() {
    let mut s = surface();
    let mixed = Operation::List(vec![Operation::Ready, Operation::Fill(Color::WHITE)]);
    assert!(mixed.apply(&mut s));
    // The fill after the ready child still ran.
    assert_eq!(s.fills.len(), 1);

    let none_ready = Operation::List(vec![
        Operation::Fill(Color::WHITE),
        Operation::Fill(Color::GREEN),
    ]);
    assert!(!none_ready.apply(&mut s));
    assert!(!Operation::List(Vec::new()).apply(&mut s));
}

#[test_log::test]
fn test_figure_draws_two_crossing_bars() {
    let figures = SharedFigures::new();
    let index = figures.push(Point::new(400, 400));
    let op = Operation::Figure {
        figures,
        index,
        style: FigureConfig::default(),
    };
    let mut s = surface();
    assert!(!op.apply(&mut s));
    assert_eq!(
        s.fills,
        vec![
            (Rect::new(325, 200, 475, 600), Color::YELLOW),
            (Rect::new(200, 325, 600, 475), Color::YELLOW),
        ]
    );
}

#[test_log::test]
fn test_move_mutates_every_holder_of_the_arena() {
    let figures = SharedFigures::new();
    let first = figures.push(Point::new(1, 2));
    let mv = Operation::Move {
        dx: 10,
        dy: -2,
        figures: figures.clone(),
    };
    // Appended after the move was created; still moved.
    let second = figures.push(Point::new(100, 100));
    let draw = Operation::Figure {
        figures: figures.clone(),
        index: second,
        style: FigureConfig::default(),
    };

    assert!(!mv.apply(&mut surface()));

    assert_eq!(figures.get(first), Some(Point::new(11, 0)));
    assert_eq!(figures.get(second), Some(Point::new(110, 98)));
    assert_eq!(draw.to_string(), "figure@110,98");
}

#[test_log::test]
fn test_operation_display() {
    let figures = SharedFigures::new();
    let op = Operation::List(vec![
        Operation::Fill(Color::WHITE),
        Operation::Move {
            dx: 1,
            dy: 2,
            figures,
        },
        Operation::Ready,
    ]);
    assert_eq!(op.to_string(), "list[fill(white), move(1,2), ready]");
}

// --- Queue tests ---

#[test_log::test]
fn test_queue_is_fifo() {
    let queue = OperationQueue::new();
    assert!(queue.is_empty());
    queue.push(Operation::Fill(Color::WHITE));
    queue.push(Operation::Fill(Color::GREEN));
    queue.push(Operation::Ready);
    assert_eq!(queue.len(), 3);

    assert_eq!(queue.pull().to_string(), "fill(white)");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.pull().to_string(), "fill(green)");
    assert_eq!(queue.pull().to_string(), "ready");
    assert!(queue.is_empty());
}

#[test_log::test]
fn test_pull_blocks_until_push() {
    let queue = Arc::new(OperationQueue::new());
    let delay = Duration::from_millis(50);

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            thread::sleep(delay);
            queue.push(Operation::Ready);
        })
    };

    let start = Instant::now();
    let op = queue.pull();
    let elapsed = start.elapsed();
    producer.join().unwrap();

    assert!(matches!(op, Operation::Ready));
    assert!(elapsed >= delay, "pull returned after {:?}", elapsed);
    assert!(queue.is_empty());
}

#[test_log::test]
fn test_concurrent_producers_keep_their_own_order() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;

    let queue = Arc::new(OperationQueue::new());
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push(Operation::Move {
                        dx: p as i32,
                        dy: i as i32,
                        figures: SharedFigures::new(),
                    });
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let mut next_expected = [0i32; PRODUCERS];
    for _ in 0..PRODUCERS * PER_PRODUCER {
        match queue.pull() {
            Operation::Move { dx, dy, .. } => {
                assert_eq!(dy, next_expected[dx as usize]);
                next_expected[dx as usize] += 1;
            }
            other => panic!("unexpected op {}", other),
        }
    }
    assert!(queue.is_empty());
}

#[test_log::test]
fn test_each_element_is_pulled_once() {
    const ITEMS: usize = 200;

    let queue = Arc::new(OperationQueue::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for _ in 0..ITEMS / 2 {
                    if let Operation::Move { dy, .. } = queue.pull() {
                        seen.lock().unwrap().push(dy);
                    }
                }
            })
        })
        .collect();

    for i in 0..ITEMS {
        queue.push(Operation::Move {
            dx: 0,
            dy: i as i32,
            figures: SharedFigures::new(),
        });
    }
    for consumer in consumers {
        consumer.join().unwrap();
    }

    let mut seen = seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..ITEMS as i32).collect::<Vec<_>>());
}

// --- Loop tests ---

#[test_log::test]
fn test_start_allocates_two_canvas_surfaces() {
    let factory = RecordingFactory::default();
    let mut paint_loop = PaintLoop::start(&factory, |_: &RecordingSurface| {}).unwrap();
    paint_loop.stop_and_wait();
    assert_eq!(*factory.allocated.lock().unwrap(), vec![CANVAS_SIZE, CANVAS_SIZE]);
}

#[test_log::test]
fn test_start_reports_allocation_failure() {
    let err = PaintLoop::start(&FailingFactory, |_: &RecordingSurface| {}).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to allocate drawing surface"), "{}", message);
    assert!(message.contains("no video memory"), "{}", message);
}

#[test_log::test]
fn test_ready_publishes_and_swaps_surfaces() {
    let (mut paint_loop, rx) = start_recording_loop();

    paint_loop.post(Operation::Fill(Color::WHITE));
    paint_loop.post(Operation::Ready);
    paint_loop.post(Operation::Fill(Color::GREEN));
    paint_loop.post(Operation::Fill(Color::GREEN));
    paint_loop.post(Operation::Ready);
    paint_loop.post(Operation::Ready);
    paint_loop.stop_and_wait();

    let published: Vec<Published> = rx.try_iter().collect();
    // Surface 0 gets the white fill, surface 1 the two green fills, then
    // surface 0 again, still holding its earlier fill.
    assert_eq!(published, vec![(0, 1), (1, 2), (0, 1)]);
    assert_eq!(paint_loop.frames_published(), 3);
}

#[test_log::test]
fn test_non_ready_ops_publish_nothing() {
    let (mut paint_loop, rx) = start_recording_loop();
    paint_loop.post(Operation::Fill(Color::WHITE));
    paint_loop.post(Operation::RectFill {
        rect: Rect::new(0, 0, 1, 1),
        color: Color::BLACK,
    });
    paint_loop.stop_and_wait();
    assert!(rx.try_iter().next().is_none());
    assert_eq!(paint_loop.frames_published(), 0);
}

#[test_log::test]
fn test_stop_drains_queue() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (mut paint_loop, _rx) = start_recording_loop();
    for _ in 0..500 {
        paint_loop.post(counting_task(&counter));
    }
    paint_loop.stop_and_wait();

    assert_eq!(counter.load(Ordering::SeqCst), 500);
    assert_eq!(paint_loop.pending(), 0);
    assert!(!paint_loop.is_running());
    // Idempotent.
    paint_loop.stop_and_wait();
}

#[test_log::test]
fn test_handles_post_from_many_threads() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (mut paint_loop, rx) = start_recording_loop();

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let handle = paint_loop.handle();
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..50 {
                    handle.post_all(vec![counting_task(&counter), Operation::Ready]);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    paint_loop.stop_and_wait();

    assert_eq!(counter.load(Ordering::SeqCst), 200);
    assert_eq!(rx.try_iter().count(), 200);
}

#[test_log::test]
fn test_post_all_ignores_empty_batch() {
    let (mut paint_loop, _rx) = start_recording_loop();
    paint_loop.post_all(Vec::new());
    assert_eq!(paint_loop.pending(), 0);
    paint_loop.stop_and_wait();
}

#[test_log::test]
fn test_drop_drains_queue() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let (paint_loop, _rx) = start_recording_loop();
        for _ in 0..20 {
            paint_loop.post(counting_task(&counter));
        }
    }
    assert_eq!(counter.load(Ordering::SeqCst), 20);
}

#[test_log::test]
fn test_moves_apply_in_posted_order_on_the_paint_thread() {
    let figures = SharedFigures::new();
    let index = figures.push(Point::new(0, 0));
    let (mut paint_loop, _rx) = start_recording_loop();

    for _ in 0..10 {
        paint_loop.post(Operation::Move {
            dx: 1,
            dy: 2,
            figures: figures.clone(),
        });
    }
    paint_loop.stop_and_wait();

    assert_eq!(figures.get(index), Some(Point::new(10, 20)));
}

#[test]
#[should_panic(expected = "backend failure")]
fn test_stop_and_wait_resumes_paint_thread_panic() {
    let (mut paint_loop, _rx) = start_recording_loop();
    paint_loop.post(Operation::task(|_| panic!("backend failure")));
    paint_loop.stop_and_wait();
}

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SLIDING_WINDOW_SIZE: u64 = 2; // In seconds
const BATCH_SIZE: u64 = 1000;

static STOP: AtomicBool = AtomicBool::new(false);

// Padded to a cache line.
#[repr(C)]
#[derive(Default)]
struct WorkerStats {
    count: AtomicU64,
    padding: [u64; 15],
}

/// Runs `func` on every physical core but one until Ctrl-C, printing the
/// aggregate calls per second from the remaining thread.
pub fn test_throughput<F>(func: F)
where
    F: Fn() + Sync + Send + 'static,
{
    ctrlc::set_handler(move || {
        STOP.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    let num_threads = num_cpus::get_physical().max(2);
    println!("Number threads: {}", num_threads);

    let func = Arc::new(func);
    let worker_stats: Arc<Vec<WorkerStats>> =
        Arc::new((0..num_threads).map(|_| WorkerStats::default()).collect());
    let mut handles = Vec::with_capacity(num_threads);

    let monitor_stats = Arc::clone(&worker_stats);
    handles.push(thread::spawn(move || {
        let mut start_time = Instant::now();
        let mut total_count_old: u64 = 0;
        while !STOP.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(500));
            let elapsed = start_time.elapsed().as_secs();
            if elapsed >= SLIDING_WINDOW_SIZE {
                let total_count: u64 = monitor_stats
                    .iter()
                    .map(|stats| stats.count.load(Ordering::Relaxed))
                    .sum();
                let throughput = (total_count - total_count_old) as f64 / elapsed as f64;
                total_count_old = total_count;
                println!("Throughput: {:.2} iterations/sec", throughput);
                start_time = Instant::now();
            }
        }
    }));

    for thread_index in 0..num_threads - 1 {
        let worker_stats = Arc::clone(&worker_stats);
        let func = Arc::clone(&func);
        handles.push(thread::spawn(move || {
            while !STOP.load(Ordering::SeqCst) {
                for _ in 0..BATCH_SIZE {
                    func();
                }
                worker_stats[thread_index]
                    .count
                    .fetch_add(BATCH_SIZE, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

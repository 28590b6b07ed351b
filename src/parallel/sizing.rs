/// Number of workers to use for `file_count` jobs on `cpu_count` cores.
///
/// Never more workers than jobs. Once there are at least as many jobs as
/// cores, oversubscribe up to twice the core count since jobs are I/O bound.
///
/// ```text
/// file_count <  cpu_count  ->  file_count
/// file_count >= cpu_count  ->  min(file_count, 2 * cpu_count)
/// ```
pub fn optimal_workers(file_count: usize, cpu_count: usize) -> usize {
    let cpu_count = cpu_count.max(1);
    if file_count < cpu_count {
        return file_count;
    }
    std::cmp::min(file_count, cpu_count.saturating_mul(2))
}

/// [`optimal_workers`] using the detected number of logical CPUs
pub fn optimal_workers_for(file_count: usize) -> usize {
    optimal_workers(file_count, num_cpus::get())
}

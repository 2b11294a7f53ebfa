//! Explicit execution context.
//!
//! Batch entry points take an [`ExecContext`] instead of consulting any global
//! device setting. The serial backend is always available; the `parallel`
//! feature adds a rayon thread pool whose size can be set by the caller or by
//! the `FRAMEWISE_THREADS` environment variable.

#[cfg(feature = "parallel")]
use alloc::sync::Arc;
use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use crate::error::FrameError;

/// Environment variable read by [`ExecContext::from_env`].
pub const THREADS_ENV: &str = "FRAMEWISE_THREADS";

#[derive(Debug, Clone, Default)]
enum Backend {
    #[default]
    Serial,
    #[cfg(feature = "parallel")]
    Pool(Arc<rayon::ThreadPool>),
}

/// Where batch and per-frame work runs.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    backend: Backend,
}

impl ExecContext {
    /// Run everything on the calling thread.
    pub fn serial() -> Self {
        Self {
            backend: Backend::Serial,
        }
    }

    /// Run on a dedicated pool of `threads` workers.
    #[cfg(feature = "parallel")]
    pub fn parallel(threads: usize) -> Result<Self, FrameError> {
        if threads == 0 {
            return Err(FrameError::InvalidConfig("thread count must be positive"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| alloc::format!("framewise-{i}"))
            .build()
            .map_err(|_| FrameError::InvalidConfig("failed to build thread pool"))?;
        log_debug!("exec: parallel context with {} threads", threads);
        Ok(Self {
            backend: Backend::Pool(Arc::new(pool)),
        })
    }

    /// Build from `FRAMEWISE_THREADS`, defaulting to one worker per core.
    ///
    /// A value of `1` (or a pool that fails to build) gives a serial context.
    #[cfg(feature = "parallel")]
    pub fn from_env() -> Self {
        let threads = std::env::var(THREADS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or_else(|| num_cpus::get().max(1));
        if threads == 1 {
            return Self::serial();
        }
        Self::parallel(threads).unwrap_or_else(|_| Self::serial())
    }

    /// Without the `parallel` feature the environment is ignored.
    #[cfg(not(feature = "parallel"))]
    pub fn from_env() -> Self {
        Self::serial()
    }

    /// Number of workers this context uses.
    pub fn threads(&self) -> usize {
        match &self.backend {
            Backend::Serial => 1,
            #[cfg(feature = "parallel")]
            Backend::Pool(pool) => pool.current_num_threads(),
        }
    }

    pub fn is_parallel(&self) -> bool {
        !matches!(self.backend, Backend::Serial)
    }

    /// Apply `f` to every item, preserving order.
    pub fn map<I, O, F>(&self, items: &[I], f: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync + Send,
    {
        match &self.backend {
            Backend::Serial => items.iter().map(f).collect(),
            #[cfg(feature = "parallel")]
            Backend::Pool(pool) => {
                use rayon::prelude::*;
                pool.install(|| items.par_iter().map(f).collect())
            }
        }
    }

    /// Fallible [`ExecContext::map`]; returns the first error encountered.
    pub fn try_map<I, O, E, F>(&self, items: &[I], f: F) -> Result<Vec<O>, E>
    where
        I: Sync,
        O: Send,
        E: Send,
        F: Fn(&I) -> Result<O, E> + Sync + Send,
    {
        match &self.backend {
            Backend::Serial => items.iter().map(f).collect(),
            #[cfg(feature = "parallel")]
            Backend::Pool(pool) => {
                use rayon::prelude::*;
                pool.install(|| items.par_iter().map(f).collect())
            }
        }
    }

    /// Split `data` into consecutive chunks of `chunk_len` (the last one may
    /// be shorter) and call `f(chunk_index, chunk)` on each. Chunks are
    /// disjoint, so they may run concurrently.
    pub fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let chunk_len = chunk_len.max(1);
        match &self.backend {
            Backend::Serial => {
                for (i, chunk) in data.chunks_mut(chunk_len).enumerate() {
                    f(i, chunk);
                }
            }
            #[cfg(feature = "parallel")]
            Backend::Pool(pool) => {
                use rayon::prelude::*;
                pool.install(|| {
                    data.par_chunks_mut(chunk_len)
                        .enumerate()
                        .for_each(|(i, chunk)| f(i, chunk))
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn serial_map_preserves_order() {
        let ctx = ExecContext::serial();
        assert_eq!(ctx.threads(), 1);
        assert!(!ctx.is_parallel());
        assert_eq!(ctx.map(&[1, 2, 3], |x| x * 10), vec![10, 20, 30]);
        let res: Result<Vec<i32>, &str> =
            ctx.try_map(&[1, 2, 3], |&x| if x == 2 { Err("two") } else { Ok(x) });
        assert_eq!(res, Err("two"));
    }

    #[test]
    fn chunks_cover_every_element_once() {
        let ctx = ExecContext::default();
        let mut data = vec![0usize; 10];
        ctx.for_each_chunk_mut(&mut data, 4, |i, chunk| {
            for x in chunk.iter_mut() {
                *x += i + 1;
            }
        });
        assert_eq!(data, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_context_matches_serial() {
        let ctx = ExecContext::parallel(2).unwrap();
        assert!(ctx.is_parallel());
        assert_eq!(ctx.threads(), 2);
        let items: Vec<usize> = (0..100).collect();
        assert_eq!(
            ctx.map(&items, |x| x * x),
            ExecContext::serial().map(&items, |x| x * x)
        );
        assert!(ExecContext::parallel(0).is_err());
    }
}

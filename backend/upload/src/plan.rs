//! Splitting a file into upload chunks.
//!
//! Chunks are contiguous, in order, and cover `[0, file_size)` exactly once.
//! Every chunk is `chunk_size` bytes except possibly the last.
use crate::error::UploadError;

pub const MIB: u64 = 1024 * 1024;

/// 15 MiB, comfortably under the proxy's body limit.
pub const CHUNK_SIZE: u64 = 15 * MIB;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// `(currentChunk, totalChunks, fileSize)` sent alongside every chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub current_chunk: u64,
    pub total_chunks: u64,
    pub file_size: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
}

impl ChunkPlan {
    pub fn new(file_size: u64, chunk_size: u64) -> Result<Self, UploadError> {
        if chunk_size == 0 {
            return Err(UploadError::InvalidChunkSize);
        }
        if file_size == 0 {
            return Err(UploadError::EmptyFile);
        }

        Ok(Self {
            file_size,
            chunk_size,
        })
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn total_chunks(&self) -> u64 {
        self.file_size.div_ceil(self.chunk_size)
    }

    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        (0..self.total_chunks()).map(|index| {
            let start = index * self.chunk_size;

            Chunk {
                index,
                start,
                end: (start + self.chunk_size).min(self.file_size),
            }
        })
    }

    pub fn descriptor(&self, chunk: &Chunk) -> ChunkDescriptor {
        ChunkDescriptor {
            current_chunk: chunk.index,
            total_chunks: self.total_chunks(),
            file_size: self.file_size,
        }
    }

    /// Percent of the file confirmed once `chunk` has been accepted.
    ///
    /// Weighted by bytes, not by chunk count, so a short last chunk moves the
    /// bar less: 32 MiB in 15 MiB chunks reports 47, 94, 100 where counting
    /// chunks would give 33, 67, 100. Only the last chunk reports 100.
    pub fn progress_after(&self, chunk: &Chunk) -> u8 {
        if chunk.end >= self.file_size {
            return 100;
        }

        let percent = (chunk.end as f64 / self.file_size as f64 * 100.0).round();

        percent.min(99.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(plan: &ChunkPlan) -> Vec<u64> {
        plan.chunks().map(|chunk| chunk.len()).collect()
    }

    #[test]
    fn test_32_mib_in_15_mib_chunks() {
        let plan = ChunkPlan::new(32 * MIB, CHUNK_SIZE).unwrap();

        assert_eq!(plan.total_chunks(), 3);
        assert_eq!(sizes(&plan), [15 * MIB, 15 * MIB, 2 * MIB]);

        let progress: Vec<u8> = plan.chunks().map(|c| plan.progress_after(&c)).collect();
        assert_eq!(progress, [47, 94, 100]);
    }

    #[test]
    fn test_exact_multiple() {
        let plan = ChunkPlan::new(30 * MIB, CHUNK_SIZE).unwrap();

        assert_eq!(sizes(&plan), [15 * MIB, 15 * MIB]);
        let progress: Vec<u8> = plan.chunks().map(|c| plan.progress_after(&c)).collect();
        assert_eq!(progress, [50, 100]);
    }

    #[test]
    fn test_smaller_than_one_chunk() {
        let plan = ChunkPlan::new(10, CHUNK_SIZE).unwrap();

        assert_eq!(plan.total_chunks(), 1);
        assert_eq!(sizes(&plan), [10]);
    }

    #[test]
    fn test_chunks_partition_file() {
        for (file_size, chunk_size) in [(1, 1), (7, 3), (100, 7), (4096, 4096), (4097, 4096)] {
            let plan = ChunkPlan::new(file_size, chunk_size).unwrap();
            let chunks: Vec<Chunk> = plan.chunks().collect();

            assert_eq!(chunks.len() as u64, file_size.div_ceil(chunk_size));
            assert_eq!(chunks.first().unwrap().start, 0);
            assert_eq!(chunks.last().unwrap().end, file_size);
            for pair in chunks.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= chunk_size));
        }
    }

    #[test]
    fn test_progress_never_hits_100_early() {
        let plan = ChunkPlan::new(1000, 999).unwrap();
        let chunks: Vec<Chunk> = plan.chunks().collect();

        assert_eq!(plan.progress_after(&chunks[0]), 99);
        assert_eq!(plan.progress_after(&chunks[1]), 100);
    }

    #[test]
    fn test_descriptor() {
        let plan = ChunkPlan::new(10, 4).unwrap();
        let last = plan.chunks().last().unwrap();

        assert_eq!(
            plan.descriptor(&last),
            ChunkDescriptor {
                current_chunk: 2,
                total_chunks: 3,
                file_size: 10,
            }
        );
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert!(matches!(ChunkPlan::new(0, 4), Err(UploadError::EmptyFile)));
        assert!(matches!(ChunkPlan::new(10, 0), Err(UploadError::InvalidChunkSize)));
    }
}

//! Anonymous virtual-memory backing for the folded set: huge-page-preferring `mmap`,
//! in-place `mremap` resize, and `Drop`-based `munmap`.
//!
//! Linux-only: huge pages and `mremap` are not portable facilities, matching the
//! reference implementation's own reliance on `sys/mman.h`.

use crate::error::Error;
use std::ptr::NonNull;

/// Threshold above which a huge-page-backed mapping is attempted before falling back
/// to normal pages. 1 << 20 words = ~8 MiB, the same cutoff the reference used.
const HUGE_PAGE_WORD_THRESHOLD: usize = 1 << 20;

const ONE_GB_HUGE_PAGE_FLAG: libc::c_int = 30 << 26; // MAP_HUGE_SHIFT == 26 on Linux

/// An owned region of `len_words` 64-bit words, backed by an anonymous mapping.
pub struct Region {
    ptr: NonNull<u64>,
    len_words: usize,
}

unsafe impl Send for Region {}
unsafe impl Sync for Region {}

impl Region {
    /// Allocates a zero-filled region of at least `len_words` words. Attempts a
    /// huge-page-backed mapping for large regions, retrying with normal pages if the
    /// kernel refuses (insufficient huge pages reserved, etc).
    pub fn new(len_words: usize) -> Result<Region, Error> {
        let bytes = (len_words * std::mem::size_of::<u64>()).max(4096);
        let want_huge = len_words > HUGE_PAGE_WORD_THRESHOLD;

        let mut flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;
        if want_huge {
            flags |= libc::MAP_HUGETLB | ONE_GB_HUGE_PAGE_FLAG;
        }

        let mut ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                flags,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED && want_huge {
            let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;
            ptr = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    bytes,
                    libc::PROT_READ | libc::PROT_WRITE,
                    flags,
                    -1,
                    0,
                )
            };
        }

        if ptr == libc::MAP_FAILED {
            return Err(Error::Allocation { bytes });
        }

        Ok(Region {
            ptr: NonNull::new(ptr as *mut u64).expect("mmap returned non-null on success"),
            len_words,
        })
    }

    pub fn len_words(&self) -> usize {
        self.len_words
    }

    pub fn as_slice(&self) -> &[u64] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len_words) }
    }

    /// # Safety
    /// Callers must not create overlapping mutable aliases; the folded set upholds
    /// this by only ever mutating slots through atomics while other readers are
    /// absent (see the set's phase discipline).
    pub fn as_atomic_slice(&self) -> &[std::sync::atomic::AtomicU64] {
        unsafe {
            std::slice::from_raw_parts(
                self.ptr.as_ptr() as *const std::sync::atomic::AtomicU64,
                self.len_words,
            )
        }
    }

    /// Resizes the mapping in place (or with a kernel-chosen move) to `new_len_words`.
    pub fn remap(&mut self, new_len_words: usize) -> Result<(), Error> {
        let old_bytes = (self.len_words * std::mem::size_of::<u64>()).max(4096);
        let new_bytes = (new_len_words * std::mem::size_of::<u64>()).max(4096);

        let new_ptr = unsafe {
            libc::mremap(
                self.ptr.as_ptr() as *mut libc::c_void,
                old_bytes,
                new_bytes,
                libc::MREMAP_MAYMOVE,
            )
        };

        if new_ptr == libc::MAP_FAILED {
            return Err(Error::Remap { old_bytes, new_bytes });
        }

        self.ptr = NonNull::new(new_ptr as *mut u64).expect("mremap returned non-null on success");
        self.len_words = new_len_words;
        Ok(())
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        let bytes = (self.len_words * std::mem::size_of::<u64>()).max(4096);
        unsafe {
            libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_region_is_zeroed() {
        let region = Region::new(1024).unwrap();
        assert!(region.as_slice().iter().all(|&w| w == 0));
    }

    #[test]
    fn remap_grows_and_preserves_prefix() {
        let mut region = Region::new(1024).unwrap();
        region.as_atomic_slice()[0].store(0xdead_beef, std::sync::atomic::Ordering::SeqCst);
        region.remap(4096).unwrap();
        assert_eq!(region.len_words(), 4096);
        assert_eq!(region.as_slice()[0], 0xdead_beef);
    }
}

//! Fixed-capacity, priority-partitioned ring buffer of CAN frames.
//!
//! `N` slots are split into `P` independent lanes, one per priority class.
//! Each lane is a FIFO ring; [`PriorityRingBuffer::read_highest`] always
//! serves the lowest-numbered non-empty lane, mirroring CAN arbitration.
//! Storage is a flat array allocated inline: nothing is allocated after
//! construction, so every method is usable from interrupt context.
use crate::protocol::transport::can_frame::CanFrame;

/// What a full lane does with a new entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// Recycle the oldest slot of the lane and flag the new entry as `overrun`.
    #[default]
    Overwrite,
    /// Refuse the new entry; `write_slot` returns `None`.
    Reject,
}

/// Bookkeeping for one lane: a window `[start, start + cap)` of the slot array.
#[derive(Clone, Copy, Debug)]
struct Lane {
    start: usize,
    cap: usize,
    head: usize,
    len: usize,
}

impl Lane {
    const EMPTY: Self = Self {
        start: 0,
        cap: 0,
        head: 0,
        len: 0,
    };

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        self.start + (self.head + offset) % self.cap
    }
}

/// Multi-lane FIFO with strict-priority dequeue.
#[derive(Debug)]
pub struct PriorityRingBuffer<const N: usize, const P: usize> {
    slots: [CanFrame; N],
    lanes: [Lane; P],
    policy: OverflowPolicy,
    overruns: u32,
}

impl<const N: usize, const P: usize> Default for PriorityRingBuffer<N, P> {
    fn default() -> Self {
        Self::new(OverflowPolicy::Overwrite)
    }
}

impl<const N: usize, const P: usize> PriorityRingBuffer<N, P> {
    const ASSERT_LAYOUT: () = assert!(
        P > 0 && P <= 8 && N >= P,
        "priority ring needs 1..=8 lanes and at least one slot per lane"
    );

    /// Create an empty buffer. Sizing is final: there is no resize.
    ///
    /// The layout is checked at compile time. More than eight lanes is
    /// refused:
    ///
    /// ```compile_fail
    /// use korri_can_sched::infra::ring::{OverflowPolicy, PriorityRingBuffer};
    /// static RING: PriorityRingBuffer<16, 9> = PriorityRingBuffer::new(OverflowPolicy::Overwrite);
    /// ```
    ///
    /// So is a lane without a slot:
    ///
    /// ```compile_fail
    /// use korri_can_sched::infra::ring::{OverflowPolicy, PriorityRingBuffer};
    /// static RING: PriorityRingBuffer<4, 7> = PriorityRingBuffer::new(OverflowPolicy::Overwrite);
    /// ```
    ///
    /// And zero lanes:
    ///
    /// ```compile_fail
    /// use korri_can_sched::infra::ring::{OverflowPolicy, PriorityRingBuffer};
    /// static RING: PriorityRingBuffer<4, 0> = PriorityRingBuffer::new(OverflowPolicy::Overwrite);
    /// ```
    ///
    /// The smallest and largest lane counts build:
    ///
    /// ```
    /// use korri_can_sched::infra::ring::{OverflowPolicy, PriorityRingBuffer};
    /// static ONE: PriorityRingBuffer<1, 1> = PriorityRingBuffer::new(OverflowPolicy::Overwrite);
    /// static EIGHT: PriorityRingBuffer<8, 8> = PriorityRingBuffer::new(OverflowPolicy::Reject);
    /// assert_eq!(ONE.capacity(), 1);
    /// assert_eq!(EIGHT.lanes(), 8);
    /// ```
    pub const fn new(policy: OverflowPolicy) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ASSERT_LAYOUT;

        let mut lanes = [Lane::EMPTY; P];
        let base = N / P;
        let extra = N % P;
        let mut start = 0;
        let mut i = 0;
        while i < P {
            let cap = if i < extra { base + 1 } else { base };
            lanes[i] = Lane {
                start,
                cap,
                head: 0,
                len: 0,
            };
            start += cap;
            i += 1;
        }

        Self {
            slots: [CanFrame::EMPTY; N],
            lanes,
            policy,
            overruns: 0,
        }
    }

    /// Total number of frame slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of lanes.
    #[inline]
    pub const fn lanes(&self) -> usize {
        P
    }

    #[inline]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Lane serving a priority class. Classes past the last lane share it.
    #[inline]
    pub fn lane_of(priority: u8) -> usize {
        (priority as usize).min(P - 1)
    }

    /// Number of slots owned by `lane`.
    pub fn lane_capacity(&self, lane: u8) -> usize {
        self.lanes[Self::lane_of(lane)].cap
    }

    /// Pending entries in `lane`.
    pub fn lane_len(&self, lane: u8) -> usize {
        self.lanes[Self::lane_of(lane)].len
    }

    /// `true` iff `lane` holds no pending entry.
    pub fn is_lane_empty(&self, lane: u8) -> bool {
        self.lane_len(lane) == 0
    }

    /// Pending entries over all lanes. Never exceeds `N`.
    pub fn len(&self) -> usize {
        self.lanes.iter().map(|lane| lane.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(|lane| lane.len == 0)
    }

    /// Entries overwritten before anyone read them, since creation.
    #[inline]
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    //==================================================================================WRITE
    /// Reserve and commit the next slot of `lane`, returning it for the caller
    /// to fill.
    ///
    /// The slot comes back zeroed. When the lane is full the oldest entry is
    /// recycled and the returned slot carries `flags.overrun`, unless the
    /// policy is [`OverflowPolicy::Reject`], in which case nothing changes and
    /// `None` is returned.
    ///
    /// Fields are stored as written. Readers get the entry normalized (29-bit
    /// id, `len` at most 8); [`Self::front`] shows it as stored.
    pub fn write_slot(&mut self, lane: u8) -> Option<&mut CanFrame> {
        let lane_idx = Self::lane_of(lane);
        let entry = &mut self.lanes[lane_idx];

        let mut overrun = false;
        if entry.len == entry.cap {
            match self.policy {
                OverflowPolicy::Reject => return None,
                OverflowPolicy::Overwrite => {
                    entry.head = (entry.head + 1) % entry.cap;
                    entry.len -= 1;
                    overrun = true;
                }
            }
        }

        let pos = entry.slot(entry.len);
        entry.len += 1;

        if overrun {
            self.overruns = self.overruns.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("lane {} full, oldest frame overwritten", lane_idx);
        }

        let slot = &mut self.slots[pos];
        *slot = CanFrame::EMPTY;
        slot.flags.overrun = overrun;
        Some(slot)
    }

    /// Copy `frame` into `lane`. `len` is clamped to 8 and the overrun marker
    /// reflects this buffer's history, not the caller's value.
    ///
    /// Returns `false` only under [`OverflowPolicy::Reject`] with a full lane.
    pub fn push(&mut self, lane: u8, frame: &CanFrame) -> bool {
        match self.write_slot(lane) {
            Some(slot) => {
                let overrun = slot.flags.overrun;
                *slot = frame.normalized();
                slot.flags.overrun = overrun;
                true
            }
            None => false,
        }
    }

    //==================================================================================READ
    /// Remove the oldest entry of `lane` and return it normalized, `None` if
    /// the lane is empty.
    pub fn read_slot(&mut self, lane: u8) -> Option<&CanFrame> {
        let entry = &mut self.lanes[Self::lane_of(lane)];
        if entry.len == 0 {
            return None;
        }
        let pos = entry.slot(0);
        entry.head = (entry.head + 1) % entry.cap;
        entry.len -= 1;

        let slot = &mut self.slots[pos];
        let overrun = slot.flags.overrun;
        *slot = slot.normalized();
        slot.flags.overrun = overrun;
        Some(&*slot)
    }

    /// Strict-priority dequeue: oldest entry of the first non-empty lane,
    /// scanning from lane 0. `None` (and no state change) when all lanes are
    /// empty.
    pub fn read_highest(&mut self) -> Option<&CanFrame> {
        let lane = self.highest_lane()?;
        self.read_slot(lane)
    }

    /// Entry `read_highest` would return, left in place.
    pub fn front(&self) -> Option<&CanFrame> {
        let lane = self.highest_lane()?;
        let entry = &self.lanes[lane as usize];
        Some(&self.slots[entry.slot(0)])
    }

    /// Lowest-numbered lane with pending entries.
    pub fn highest_lane(&self) -> Option<u8> {
        self.lanes
            .iter()
            .position(|lane| lane.len > 0)
            .map(|idx| idx as u8)
    }

    /// Drop every pending entry. Slot layout is kept.
    pub fn clear(&mut self) {
        for lane in self.lanes.iter_mut() {
            lane.head = 0;
            lane.len = 0;
        }
    }
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
/// The day counter is 9 bits wide.
const DAY_LIMIT: u64 = 512;

/// One snapshot of the MBC3 clock registers (0x08–0x0C).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RtcRegisters {
    pub(crate) seconds: u8,
    pub(crate) minutes: u8,
    pub(crate) hours: u8,
    pub(crate) days: u16,
    pub(crate) halt: bool,
    pub(crate) carry: bool,
}

impl RtcRegisters {
    /// Register 0x0C: bit 0 day counter bit 8, bit 6 halt, bit 7 day carry.
    fn control_byte(&self) -> u8 {
        let mut out = ((self.days >> 8) as u8) & 0x01;
        if self.halt {
            out |= 0x40;
        }
        if self.carry {
            out |= 0x80;
        }
        out
    }

    fn total_seconds(&self) -> u64 {
        u64::from(self.days) * SECONDS_PER_DAY
            + u64::from(self.hours) * 3600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }

    /// Host wall time (UTC) as clock registers, days wrapped to 9 bits
    /// without setting the carry.
    fn from_host(now: SystemTime) -> Self {
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        let mut regs = Self::default();
        regs.set_total_seconds(since_epoch.as_secs() % (DAY_LIMIT * SECONDS_PER_DAY));
        regs
    }

    fn set_total_seconds(&mut self, total: u64) {
        let days = total / SECONDS_PER_DAY;
        if days >= DAY_LIMIT {
            self.carry = true;
        }
        self.days = (days % DAY_LIMIT) as u16;
        let rest = total % SECONDS_PER_DAY;
        self.hours = (rest / 3600) as u8;
        self.minutes = (rest / 60 % 60) as u8;
        self.seconds = (rest % 60) as u8;
    }
}

/// MBC3 real-time clock, running off host wall time.
///
/// The live registers start at the host's UTC time of day and day count
/// when the cartridge is loaded. They only advance when somebody looks at
/// them: every latch or register write first folds the wall time elapsed
/// since the previous access into the counters. Reads always see the latched copy.
pub(crate) struct Rtc {
    live: RtcRegisters,
    latched: RtcRegisters,
    last_sync: SystemTime,
    /// Wall time accumulated towards the next whole second.
    pending: Duration,
}

impl Rtc {
    pub(crate) fn new(now: SystemTime) -> Self {
        let live = RtcRegisters::from_host(now);
        let subsec = now
            .duration_since(UNIX_EPOCH)
            .map(|d| Duration::from_nanos(u64::from(d.subsec_nanos())))
            .unwrap_or_default();
        Self {
            live,
            latched: live,
            last_sync: now,
            pending: subsec,
        }
    }

    /// Fold wall time up to `now` into the live registers. A clock that
    /// went backwards counts as no time passing.
    pub(crate) fn sync(&mut self, now: SystemTime) {
        let elapsed = now.duration_since(self.last_sync).unwrap_or_default();
        self.last_sync = now;
        if self.live.halt {
            return;
        }

        self.pending += elapsed;
        let whole = self.pending.as_secs();
        if whole > 0 {
            self.pending -= Duration::from_secs(whole);
            let total = self.live.total_seconds().saturating_add(whole);
            self.live.set_total_seconds(total);
        }
    }

    /// Copy the live registers into the readable snapshot.
    pub(crate) fn latch(&mut self, now: SystemTime) {
        self.sync(now);
        self.latched = self.live;
        log::trace!("RTC latched {:?}", self.latched);
    }

    pub(crate) fn read(&self, reg: u8) -> u8 {
        match reg {
            0x08 => self.latched.seconds,
            0x09 => self.latched.minutes,
            0x0A => self.latched.hours,
            0x0B => self.latched.days as u8,
            0x0C => self.latched.control_byte(),
            _ => 0xFF,
        }
    }

    /// Set a live register. Writing the seconds register also restarts the
    /// sub-second divider.
    pub(crate) fn write(&mut self, reg: u8, value: u8, now: SystemTime) {
        self.sync(now);
        match reg {
            0x08 => {
                self.live.seconds = value & 0x3F;
                self.pending = Duration::ZERO;
            }
            0x09 => self.live.minutes = value & 0x3F,
            0x0A => self.live.hours = value & 0x1F,
            0x0B => self.live.days = (self.live.days & 0x0100) | u16::from(value),
            0x0C => {
                self.live.days = (self.live.days & 0x00FF) | (u16::from(value & 0x01) << 8);
                self.live.halt = value & 0x40 != 0;
                self.live.carry = value & 0x80 != 0;
            }
            _ => {}
        }
    }

    #[cfg(test)]
    pub(crate) fn live(&self) -> RtcRegisters {
        self.live
    }
}

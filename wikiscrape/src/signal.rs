use std::sync::atomic::AtomicBool;
#[cfg(unix)]
use std::sync::atomic::Ordering;

/// Set by the signal handler; the enrichment loop polls it between items so
/// an interrupted run still reaches the final catalog save.
pub static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn mark_interrupted(_signum: libc::c_int) {
	INTERRUPTED.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
pub fn install() {
	let handler = mark_interrupted as extern "C" fn(libc::c_int);
	unsafe {
		libc::signal(libc::SIGINT, handler as libc::sighandler_t);
		libc::signal(libc::SIGTERM, handler as libc::sighandler_t);
	}
}

/// On non-Unix targets the process just dies on Ctrl-C; partial progress is
/// lost, matching the original tool.
#[cfg(not(unix))]
pub fn install() {}

//! 捕获 body 中的 panic，记录位置和调用栈

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::failure::{Failure, PanicSite};

thread_local! {
    /// 当前线程处于边界内的层数
    static GUARDED: Cell<u32> = const { Cell::new(0) };
    static LAST_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// 只对边界内的线程生效，其余 panic 交还给原 hook
fn install_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let guarded = GUARDED.try_with(|g| g.get() > 0).unwrap_or(false);
            if !guarded {
                previous(info);
                return;
            }
            let site = PanicSite {
                location: info.location().map(|l| l.to_string()),
                backtrace: Backtrace::force_capture().to_string(),
            };
            let _ = LAST_SITE.try_with(|s| *s.borrow_mut() = Some(site));
        }));
    });
}

/// 运行 f；panic 时转为 Unexpected 失败
pub(crate) fn catch<R>(f: impl FnOnce() -> R) -> Result<R, Failure> {
    install_hook();
    GUARDED.with(|g| g.set(g.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|g| g.set(g.get() - 1));

    result.map_err(|payload| {
        let site = LAST_SITE.with(|s| s.borrow_mut().take());
        tracing::debug!("Caught panic at {:?}", site.as_ref().and_then(|s| s.location.as_deref()));
        Failure::from_panic(payload.as_ref(), site)
    })
}

use std::sync::OnceLock;

use crate::Codec;

static GLOBAL: OnceLock<Codec> = OnceLock::new();

/// Install the process-wide codec. Only the first call succeeds; later
/// calls hand their codec back.
pub fn install(codec: Codec) -> Result<(), Codec> {
    let strategy = codec.strategy();
    GLOBAL.set(codec)?;
    log::info!("installed process-wide codec ({strategy:?})");
    Ok(())
}

/// The process-wide codec, if one was installed.
#[inline]
pub fn global() -> Option<&'static Codec> {
    GLOBAL.get()
}

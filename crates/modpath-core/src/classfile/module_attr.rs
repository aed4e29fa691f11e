//! Decoding of the `Module` attribute (JVMS §4.7.25).

use super::constant_pool::ConstantPool;
use super::reader::Reader;
use super::ClassfileError;
use crate::descriptor::{ModuleDescriptor, Modifier};

pub(crate) const ACC_TRANSITIVE: u16 = 0x0020;
pub(crate) const ACC_STATIC_PHASE: u16 = 0x0040;

/// Decode the attribute body into a declared module descriptor.
pub(crate) fn decode(
    r: &mut Reader<'_>,
    pool: &ConstantPool<'_>,
) -> Result<ModuleDescriptor, ClassfileError> {
    let name = pool.module_name(r.u2()?)?;
    let _flags = r.u2()?;
    let _version = r.u2()?;

    let mut builder = ModuleDescriptor::new_module(name);

    for _ in 0..r.u2()? {
        let required = pool.module_name(r.u2()?)?;
        let flags = r.u2()?;
        let _version = r.u2()?;
        builder = builder.requires_with(modifiers(flags), required);
    }

    for _ in 0..r.u2()? {
        let package = pool.package_name(r.u2()?)?;
        let _flags = r.u2()?;
        let to_count = r.u2()?;
        if to_count == 0 {
            builder = builder.exports(package);
        } else {
            let mut targets = Vec::with_capacity(usize::from(to_count));
            for _ in 0..to_count {
                targets.push(pool.module_name(r.u2()?)?);
            }
            builder = builder.exports_to(package, targets);
        }
    }

    // opens: same layout as exports, not part of the descriptor
    for _ in 0..r.u2()? {
        r.skip(4)?;
        let to_count = r.u2()?;
        r.skip(usize::from(to_count) * 2)?;
    }

    for _ in 0..r.u2()? {
        builder = builder.uses(pool.class_name(r.u2()?)?);
    }

    for _ in 0..r.u2()? {
        let service = pool.class_name(r.u2()?)?;
        let with_count = r.u2()?;
        let mut providers = Vec::with_capacity(usize::from(with_count));
        for _ in 0..with_count {
            providers.push(pool.class_name(r.u2()?)?);
        }
        builder = builder.provides(service, providers);
    }

    Ok(builder.build()?)
}

fn modifiers(flags: u16) -> impl Iterator<Item = Modifier> {
    let transitive = (flags & ACC_TRANSITIVE != 0).then_some(Modifier::Transitive);
    let static_phase = (flags & ACC_STATIC_PHASE != 0).then_some(Modifier::Static);
    transitive.into_iter().chain(static_phase)
}

//! Sampler state and the deduplicating sampler cache.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::device::Device;
use crate::error::Result;
use crate::types::{AddressMode, BorderColor, CompareOp, Filter, SampleCount};

/// How a texture is filtered and addressed when sampled.
///
/// Equality and hashing cover every field. Float fields compare by bit
/// pattern with `-0.0` folded into `0.0`, so equal states always hash equal.
/// A min or mag filter of [`Filter::None`] samples as [`Filter::Linear`] and
/// is keyed as such.
#[derive(Debug, Clone, Copy)]
pub struct SamplerState {
    /// Minification filter.
    pub min_filter: Filter,
    /// Magnification filter.
    pub mag_filter: Filter,
    /// Filter between mip levels; [`Filter::None`] disables mipmapping.
    pub mipmap_filter: Filter,
    /// Wrapping along U (`S`).
    pub address_mode_u: AddressMode,
    /// Wrapping along V (`T`).
    pub address_mode_v: AddressMode,
    /// Wrapping along W (`R`).
    pub address_mode_w: AddressMode,
    /// Border color for [`AddressMode::ClampToBorder`].
    pub border_color: BorderColor,
    /// Maximum anisotropy.
    pub anisotropy: SampleCount,
    /// Depth comparison; `Some` turns this into a shadow sampler.
    pub compare_op: Option<CompareOp>,
    /// Mip level bias.
    pub lod_bias: f32,
    /// Lowest mip level used.
    pub min_lod: f32,
    /// Highest mip level used.
    pub max_lod: f32,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            mipmap_filter: Filter::None,
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            border_color: BorderColor::FloatOpaqueWhite,
            anisotropy: SampleCount::Samples1,
            compare_op: None,
            lod_bias: 0.0,
            min_lod: -1000.0,
            max_lod: 1000.0,
        }
    }
}

impl SamplerState {
    /// Min and mag filters as the driver applies them.
    fn texel_filters(&self) -> [Filter; 2] {
        [self.min_filter, self.mag_filter].map(|filter| match filter {
            Filter::None => Filter::Linear,
            other => other,
        })
    }

    /// Float fields as hashable bits.
    fn float_bits(&self) -> [u32; 3] {
        [self.lod_bias, self.min_lod, self.max_lod].map(|v| if v == 0.0 { 0 } else { v.to_bits() })
    }
}

impl PartialEq for SamplerState {
    fn eq(&self, other: &Self) -> bool {
        self.texel_filters() == other.texel_filters()
            && self.mipmap_filter == other.mipmap_filter
            && self.address_mode_u == other.address_mode_u
            && self.address_mode_v == other.address_mode_v
            && self.address_mode_w == other.address_mode_w
            && self.border_color == other.border_color
            && self.anisotropy == other.anisotropy
            && self.compare_op == other.compare_op
            && self.float_bits() == other.float_bits()
    }
}

impl Eq for SamplerState {}

impl Hash for SamplerState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.texel_filters().hash(state);
        self.mipmap_filter.hash(state);
        self.address_mode_u.hash(state);
        self.address_mode_v.hash(state);
        self.address_mode_w.hash(state);
        self.border_color.hash(state);
        self.anisotropy.hash(state);
        self.compare_op.hash(state);
        self.float_bits().hash(state);
    }
}

/// Hands out one shared driver sampler per distinct [`SamplerState`].
///
/// Samplers returned from [`get_or_create`](Self::get_or_create) stay owned
/// by the cache; callers must not destroy them. Every sampler is released by
/// [`clear`](Self::clear) or when the cache is dropped.
pub struct SamplerCache<D: Device> {
    device: D,
    samplers: FxHashMap<SamplerState, D::Sampler>,
}

impl<D: Device> SamplerCache<D> {
    /// Empty cache creating samplers on `device`.
    pub fn new(device: D) -> Self {
        Self {
            device,
            samplers: FxHashMap::default(),
        }
    }

    /// Return the sampler for `state`, creating it on first request.
    ///
    /// Field-wise equal states always yield the same driver object.
    ///
    /// # Errors
    ///
    /// Propagates the device's error if sampler creation fails; nothing is
    /// cached in that case.
    pub fn get_or_create(&mut self, state: &SamplerState) -> Result<D::Sampler> {
        if let Some(&sampler) = self.samplers.get(state) {
            log::trace!("sampler cache hit: {sampler:?}");
            return Ok(sampler);
        }

        let sampler = self.device.create_sampler(state)?;
        log::debug!(
            "created sampler {sampler:?} ({} cached): {state:?}",
            self.samplers.len() + 1
        );
        self.samplers.insert(*state, sampler);
        Ok(sampler)
    }

    /// Number of distinct cached samplers.
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }

    /// Destroy every cached sampler. Later requests all miss.
    pub fn clear(&mut self) {
        if self.samplers.is_empty() {
            return;
        }
        log::debug!("destroying {} cached samplers", self.samplers.len());
        for (_, sampler) in self.samplers.drain() {
            self.device.destroy_sampler(sampler);
        }
    }

    /// The device samplers are created on.
    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: Device> Drop for SamplerCache<D> {
    fn drop(&mut self) {
        self.clear();
    }
}

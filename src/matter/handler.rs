//! Generic rs-matter handler serving a vendor cluster from a shared value.
//!
//! Lets a bridge expose e.g. an Eve Energy reading on one of its own endpoints.
//! Reads and writes are routed through the cluster's descriptor, so every
//! vendor cluster gets the same handler.

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use rs_matter::dm::{
    Dataver, Handler, NonBlockingHandler, ReadContext, ReadReply, Reply, WriteContext,
};
use rs_matter::error::{Error, ErrorCode};
use rs_matter::tlv::{TLVElement, TLVTag, TLVWrite};

use crate::clusters::{ClusterValue, VendorCluster, is_global_attribute};
use crate::codec::decode_nullable;

/// Handler that serves a vendor cluster.
pub struct VendorClusterHandler<C: VendorCluster> {
    dataver: Dataver,
    state: Arc<RwLock<C::Value>>,
    _cluster: PhantomData<C>,
}

impl<C: VendorCluster> VendorClusterHandler<C> {
    /// Create a new handler over a shared cluster value.
    pub fn new(dataver: Dataver, state: Arc<RwLock<C::Value>>) -> Self {
        Self {
            dataver,
            state,
            _cluster: PhantomData,
        }
    }

    /// The shared value backing this handler.
    pub fn state(&self) -> &Arc<RwLock<C::Value>> {
        &self.state
    }

    /// Apply a change from the device side and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut C::Value),
    {
        f(&mut self.state.write());
        self.dataver.changed();
    }

    /// Current dataver, bumped on every update or accepted write.
    pub fn dataver(&self) -> u32 {
        self.dataver.get()
    }

    /// Encode the current value of `attr_id` under `tag`, TLV null while
    /// the value has not been reported yet.
    fn read_attr<W: TLVWrite>(&self, attr_id: u32, tag: &TLVTag, mut tw: W) -> Result<(), Error> {
        let field = C::descriptor()
            .field(attr_id)
            .ok_or(ErrorCode::AttributeNotFound)?;

        match self.state.read().get(field.attribute_id) {
            Some(value) => value.to_tlv(tag, &mut tw),
            None => tw.null(tag),
        }
    }

    /// Store a written value. Null clears the field.
    fn write_attr(&self, attr_id: u32, data: &TLVElement<'_>) -> Result<(), Error> {
        let field = C::descriptor()
            .field(attr_id)
            .ok_or(ErrorCode::AttributeNotFound)?;

        if !field.writable {
            return Err(ErrorCode::UnsupportedAccess.into());
        }

        let value = decode_nullable(field.wire_type, data)?;

        self.state
            .write()
            .set(field.attribute_id, value)
            .map_err(|e| {
                log::warn!("Write to {} failed: {}", field.label, e);
                Error::new(ErrorCode::ConstraintError)
            })?;
        self.dataver.changed();

        log::debug!("{}.{} written: {:?}", C::NAME, field.label, value);

        Ok(())
    }

    fn read_impl(&self, ctx: impl ReadContext, reply: impl ReadReply) -> Result<(), Error> {
        let attr = ctx.attr();

        let Some(mut writer) = reply.with_dataver(self.dataver.get())? else {
            return Ok(());
        };

        // Global attributes
        if is_global_attribute(attr.attr_id) {
            return C::CLUSTER.read(attr, writer);
        }

        let tag = writer.tag();
        self.read_attr(attr.attr_id, tag, writer.writer())?;

        writer.complete()
    }

    fn write_impl(&self, ctx: impl WriteContext) -> Result<(), Error> {
        let attr = ctx.attr();

        attr.check_dataver(self.dataver.get())?;

        self.write_attr(attr.attr_id, ctx.data())
    }
}

impl<C: VendorCluster> Handler for VendorClusterHandler<C> {
    fn read(&self, ctx: impl ReadContext, reply: impl ReadReply) -> Result<(), Error> {
        self.read_impl(ctx, reply)
    }

    fn write(&self, ctx: impl WriteContext) -> Result<(), Error> {
        self.write_impl(ctx)
    }
}

impl<C: VendorCluster> NonBlockingHandler for VendorClusterHandler<C> {}

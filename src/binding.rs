use std::cell::RefCell;
use std::rc::Rc;

/// At most one device may be bound to the control channel at a time.
///
/// Re-binding while a device is bound is refused but reported as success (the
/// channel still has a bound device, just not the one offered); unbinding
/// requires presenting the bound device's own handle. Swapping devices means
/// an explicit unbind first.
#[derive(Debug)]
pub struct DeviceBinding<D> {
    device: Option<Rc<RefCell<D>>>,
}

impl<D> DeviceBinding<D> {
    pub fn new() -> Self {
        Self { device: None }
    }

    /// Binds `device` if nothing is bound yet. Returns true whenever a device
    /// is bound on return, including the refused re-bind no-op.
    pub fn bind(&mut self, device: Rc<RefCell<D>>) -> bool {
        if self.device.is_some() {
            tracing::warn!("already bound to a device, refusing re-bind");
            return true;
        }
        self.device = Some(device);
        true
    }

    /// Clears the binding. True only when `device` is the bound device;
    /// otherwise the binding is left untouched.
    pub fn unbind(&mut self, device: &Rc<RefCell<D>>) -> bool {
        match &self.device {
            Some(bound) if Rc::ptr_eq(bound, device) => {
                self.device = None;
                true
            }
            Some(_) => {
                tracing::warn!("unbind with a device that is not the bound one, refusing");
                false
            }
            None => {
                tracing::warn!("unbind with nothing bound");
                false
            }
        }
    }

    pub fn bound(&self) -> Option<&Rc<RefCell<D>>> {
        self.device.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.device.is_some()
    }
}

impl<D> Default for DeviceBinding<D> {
    fn default() -> Self {
        Self::new()
    }
}

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The dynamic plugin ABI.
//!
//! A plugin module exports two C functions: a *create* function that hands a
//! heap-allocated instance to the host, and a *destroy* function that takes it
//! back. Ownership moves to the host on create and back to the module on
//! destroy; nothing relies on library unload hooks.
//!
//! The instance crosses the boundary as a `*mut Box<dyn Trait>` erased to
//! `*mut c_void`, so host and plugin must be built by the same compiler
//! against the same version of the trait's crate.
//!
//! [`PluginHandle`] owns one such instance and returns it to the module's
//! destroy function when dropped, before the library itself is released.
//! Statically linked plugins use [`PluginHandle::from_box`] so hosts handle
//! both cases the same way.

use libloading::{Library, Symbol};
use std::ffi::c_void;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::Arc;

/// Signature of an exported create function.
pub type CreateFn = unsafe extern "C" fn() -> *mut c_void;
/// Signature of an exported destroy function.
pub type DestroyFn = unsafe extern "C" fn(*mut c_void);

/// Errors raised while opening a plugin module or instantiating from it.
#[derive(Debug, Clone)]
pub enum PluginLoadError {
    /// The shared library could not be opened.
    LibraryLoad {
        /// Path of the module.
        path: PathBuf,
        /// Loader message.
        message: String,
    },
    /// A required exported symbol is missing.
    MissingSymbol {
        /// The symbol that was looked up.
        symbol: String,
        /// Loader message.
        message: String,
    },
    /// The create function returned a null pointer.
    NullInstance {
        /// The create symbol that was called.
        symbol: String,
    },
}

impl fmt::Display for PluginLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LibraryLoad { path, message } => {
                write!(f, "Failed to load plugin library {}: {message}", path.display())
            }
            Self::MissingSymbol { symbol, message } => {
                write!(f, "Missing plugin symbol '{symbol}': {message}")
            }
            Self::NullInstance { symbol } => {
                write!(f, "Plugin constructor '{symbol}' returned null")
            }
        }
    }
}

impl std::error::Error for PluginLoadError {}

/// Keeps a loaded module mapped while anything created from it is alive.
///
/// Objects whose code lives in a plugin (actors, processors) hold a guard so
/// the module outlives them even after the host unloads the plugin.
#[derive(Clone)]
pub struct LibraryGuard(#[allow(dead_code)] Arc<Library>);

impl fmt::Debug for LibraryGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LibraryGuard")
    }
}

/// An opened plugin module.
pub struct PluginLibrary {
    path: PathBuf,
    library: Arc<Library>,
}

impl PluginLibrary {
    /// Opens the shared library at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PluginLoadError> {
        let path = path.as_ref();
        log::debug!("Opening plugin library {}", path.display());

        // SAFETY: loading a library runs its initialisers. Plugin modules are
        // trusted code built alongside the host.
        let library = unsafe { Library::new(path) }.map_err(|e| PluginLoadError::LibraryLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            library: Arc::new(library),
        })
    }

    /// The path the module was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a guard keeping this module loaded.
    pub fn guard(&self) -> LibraryGuard {
        LibraryGuard(self.library.clone())
    }

    /// Calls the module's create function and wraps the result.
    ///
    /// # Safety
    ///
    /// `create` must name a [`CreateFn`] returning a pointer obtained from
    /// `Box::into_raw(Box::new(instance))` where `instance: Box<T>`, and
    /// `destroy` must name a [`DestroyFn`] that reclaims exactly that pointer.
    /// [`export_plugin!`](crate::export_plugin) generates such a pair.
    pub unsafe fn instantiate<T: ?Sized>(
        &self,
        create: &str,
        destroy: &str,
    ) -> Result<PluginHandle<T>, PluginLoadError> {
        let create_fn: Symbol<CreateFn> =
            self.library
                .get(create.as_bytes())
                .map_err(|e| PluginLoadError::MissingSymbol {
                    symbol: create.to_owned(),
                    message: e.to_string(),
                })?;
        let destroy_fn: Symbol<DestroyFn> =
            self.library
                .get(destroy.as_bytes())
                .map_err(|e| PluginLoadError::MissingSymbol {
                    symbol: destroy.to_owned(),
                    message: e.to_string(),
                })?;
        let destroy_fn: DestroyFn = *destroy_fn;

        let raw = create_fn() as *mut Box<T>;
        let ptr = NonNull::new(raw).ok_or_else(|| PluginLoadError::NullInstance {
            symbol: create.to_owned(),
        })?;

        log::info!("Instantiated plugin from {}", self.path.display());
        Ok(PluginHandle {
            instance: Instance::Foreign {
                ptr,
                destroy: destroy_fn,
            },
            guard: Some(self.guard()),
        })
    }
}

impl fmt::Debug for PluginLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginLibrary")
            .field("path", &self.path)
            .finish()
    }
}

enum Instance<T: ?Sized> {
    Local(Box<T>),
    Foreign {
        ptr: NonNull<Box<T>>,
        destroy: DestroyFn,
    },
}

/// A uniquely owned plugin instance.
///
/// Dropping the handle gives a foreign instance back to its module's destroy
/// function, then releases this handle's hold on the module.
pub struct PluginHandle<T: ?Sized> {
    instance: Instance<T>,
    guard: Option<LibraryGuard>,
}

impl<T: ?Sized> PluginHandle<T> {
    /// Wraps a statically linked instance.
    pub fn from_box(instance: Box<T>) -> Self {
        Self {
            instance: Instance::Local(instance),
            guard: None,
        }
    }

    /// `true` if the instance came from a dynamically loaded module.
    pub fn is_dynamic(&self) -> bool {
        matches!(self.instance, Instance::Foreign { .. })
    }

    /// The guard of the module the instance came from, if any.
    pub fn guard(&self) -> Option<&LibraryGuard> {
        self.guard.as_ref()
    }
}

impl<T: ?Sized> Deref for PluginHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.instance {
            Instance::Local(b) => b,
            // SAFETY: the pointer came from `Box::into_raw` and stays valid until drop.
            Instance::Foreign { ptr, .. } => unsafe { ptr.as_ref() },
        }
    }
}

impl<T: ?Sized> DerefMut for PluginHandle<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.instance {
            Instance::Local(b) => b,
            // SAFETY: unique ownership; see `deref`.
            Instance::Foreign { ptr, .. } => unsafe { ptr.as_mut() },
        }
    }
}

impl<T: ?Sized> Drop for PluginHandle<T> {
    fn drop(&mut self) {
        if let Instance::Foreign { ptr, destroy } = &self.instance {
            // SAFETY: the module is still mapped (`guard` drops after this body)
            // and the pointer is returned exactly once.
            unsafe { destroy(ptr.as_ptr() as *mut c_void) };
        }
    }
}

// SAFETY: the handle owns its instance exclusively, like a `Box<T>`.
unsafe impl<T: ?Sized + Send> Send for PluginHandle<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: ?Sized + Sync> Sync for PluginHandle<T> {}

impl<T: ?Sized> fmt::Debug for PluginHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHandle")
            .field("dynamic", &self.is_dynamic())
            .finish()
    }
}

/// Exports a create/destroy function pair for a plugin module.
///
/// ```ignore
/// simforge_core::export_plugin!(
///     create_component,
///     destroy_component,
///     dyn my_host::Plugin,
///     MyPlugin::default()
/// );
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($create:ident, $destroy:ident, $trait_ty:ty, $ctor:expr) => {
        /// Creates the plugin instance and hands its ownership to the caller,
        /// which must release it through the matching destroy function.
        #[no_mangle]
        pub extern "C" fn $create() -> *mut ::std::ffi::c_void {
            let instance: ::std::boxed::Box<$trait_ty> = ::std::boxed::Box::new($ctor);
            ::std::boxed::Box::into_raw(::std::boxed::Box::new(instance)) as *mut ::std::ffi::c_void
        }

        /// # Safety
        ///
        /// `instance` must come from the matching create function and be
        /// passed back exactly once.
        #[no_mangle]
        pub unsafe extern "C" fn $destroy(instance: *mut ::std::ffi::c_void) {
            if !instance.is_null() {
                drop(::std::boxed::Box::from_raw(
                    instance as *mut ::std::boxed::Box<$trait_ty>,
                ));
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter {
        fn greet(&self) -> String;
        fn rename(&mut self, name: &str);
    }

    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct English {
        name: String,
    }

    impl Greeter for English {
        fn greet(&self) -> String {
            format!("hello {}", self.name)
        }

        fn rename(&mut self, name: &str) {
            self.name = name.to_owned();
        }
    }

    impl Drop for English {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    mod exported {
        use super::{English, Greeter};
        crate::export_plugin!(
            test_create_greeter,
            test_destroy_greeter,
            dyn Greeter,
            English {
                name: "world".to_owned()
            }
        );
    }

    #[test]
    fn local_handle_derefs_and_drops() {
        let before = DROPS.load(Ordering::SeqCst);
        let mut handle: PluginHandle<dyn Greeter> = PluginHandle::from_box(Box::new(English {
            name: "sim".to_owned(),
        }));
        assert!(!handle.is_dynamic());
        assert!(handle.guard().is_none());
        handle.rename("site");
        assert_eq!(handle.greet(), "hello site");
        drop(handle);
        assert!(DROPS.load(Ordering::SeqCst) > before);
    }

    #[test]
    fn exported_pair_transfers_ownership() {
        let before = DROPS.load(Ordering::SeqCst);
        let raw = exported::test_create_greeter();
        assert!(!raw.is_null());
        // SAFETY: pointer produced by the matching create function.
        let greeting = unsafe { (*(raw as *mut Box<dyn Greeter>)).greet() };
        assert_eq!(greeting, "hello world");
        // SAFETY: returned exactly once.
        unsafe { exported::test_destroy_greeter(raw) };
        assert!(DROPS.load(Ordering::SeqCst) > before);
    }

    #[test]
    fn missing_library_is_an_error() {
        let err = PluginLibrary::open("/definitely/not/here/libnothing.so").unwrap_err();
        assert!(matches!(err, PluginLoadError::LibraryLoad { .. }));
        assert!(err.to_string().contains("libnothing"));
    }
}

//! Storage migrations for pallet-opal-ledger.
//!
//! Each migration is versioned against `STORAGE_VERSION` and runs exactly
//! once: the version check makes re-runs a no-op. Runtimes wire migrations
//! into their `Executive` migration tuple in sequence (v1 → v2 → ...).

use frame_support::{pallet_prelude::*, traits::OnRuntimeUpgrade};
use sp_std::marker::PhantomData;

use crate::{Config, Pallet};

/// Migration to version 1 (initial release).
///
/// A no-op that pins the storage version; subsequent migrations follow the
/// same shape and perform actual storage transformations.
pub mod v1 {
    use super::*;

    pub struct MigrateToV1<T>(PhantomData<T>);

    impl<T: Config> OnRuntimeUpgrade for MigrateToV1<T> {
        fn on_runtime_upgrade() -> Weight {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();

            if on_chain_version < 1 {
                log::info!(
                    target: "pallet-opal-ledger",
                    "Running migration v0 → v1 (no-op for initial release)"
                );

                StorageVersion::new(1).put::<Pallet<T>>();

                T::DbWeight::get().reads_writes(1, 1)
            } else {
                log::info!(
                    target: "pallet-opal-ledger",
                    "Storage already at v{on_chain_version:?}, skipping v1 migration"
                );

                T::DbWeight::get().reads(1)
            }
        }

        #[cfg(feature = "try-runtime")]
        fn pre_upgrade() -> Result<sp_std::vec::Vec<u8>, sp_runtime::TryRuntimeError> {
            Ok(Pallet::<T>::on_chain_storage_version().encode())
        }

        #[cfg(feature = "try-runtime")]
        fn post_upgrade(state: sp_std::vec::Vec<u8>) -> Result<(), sp_runtime::TryRuntimeError> {
            let pre_version: u16 = Decode::decode(&mut &state[..])
                .map_err(|_| sp_runtime::TryRuntimeError::Other("Failed to decode pre-state"))?;

            if pre_version < 1 {
                frame_support::ensure!(
                    Pallet::<T>::on_chain_storage_version() >= 1,
                    sp_runtime::TryRuntimeError::Other("Migration to v1 did not complete")
                );
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{new_test_ext, Test};
    use frame_support::traits::StorageVersion;

    /// Migration updates the storage version from 0 to 1.
    #[test]
    fn migration_v1_from_v0_works() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 0);

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }

    /// Migration is idempotent: running it twice leaves the version at 1.
    #[test]
    fn migration_v1_idempotent() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(1).put::<Pallet<Test>>();

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }

    /// Migration does not touch storage already past v1.
    #[test]
    fn migration_v1_skipped_on_higher_version() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(5).put::<Pallet<Test>>();

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 5);
        });
    }
}

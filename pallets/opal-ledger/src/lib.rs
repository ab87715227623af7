#![cfg_attr(not(feature = "std"), no_std)]
// Allow deprecated weight constants for MVP (will be replaced by benchmarks post-audit)
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::{
    dispatch::DispatchResult,
    ensure,
    pallet_prelude::*,
    storage::with_transaction,
    traits::UnixTime,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_runtime::TransactionOutcome;
use sp_std::prelude::*;

pub use pallet::*;

pub mod signature;

pub mod migrations;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

use signature::{EcdsaSignature, RecoverSigner, RecoveryError};

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

/// Capability grants recognized by the ledger.
///
/// `Admin` is self-referential: only Admin holders may grant or revoke any
/// role, including Admin itself.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
pub enum Role {
    /// May grant and revoke roles and manage the blacklist.
    Admin,
    /// May issue new units up to the supply ceiling.
    Minter,
    /// May destroy units from any account.
    Burner,
    /// May pause and unpause transfer-class operations.
    Pauser,
    /// May update the cool-down and per-transaction ceiling policies.
    PolicySetter,
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Ambient wall-clock time, in seconds, used for expirations and
        /// cool-down enforcement.
        type TimeProvider: UnixTime;

        /// Recovers the authorizing account from a signed instruction digest.
        type SignerRecovery: RecoverSigner<Self::AccountId>;

        /// Hard ceiling on total issuance.
        #[pallet::constant]
        type MaxSupply: Get<u128>;

        /// Identifies this ledger instance inside signed payloads. An
        /// instruction signed for one deployment cannot be replayed against
        /// another with a different identifier.
        #[pallet::constant]
        type LedgerId: Get<[u8; 8]>;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Total units in circulation. Always equals the sum over `Balances`.
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances. Entries appear on first credit and are never removed;
    /// a zero balance is a valid steady state.
    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Spending allowances, keyed by (owner, spender).
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Role membership, keyed by (role, account).
    #[pallet::storage]
    #[pallet::getter(fn has_role)]
    pub type Roles<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        Role,
        Blake2_128Concat,
        T::AccountId,
        bool,
        ValueQuery,
    >;

    /// Accounts barred from sending or receiving transfer-class operations.
    #[pallet::storage]
    #[pallet::getter(fn is_blacklisted)]
    pub type Blacklist<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Global pause flag. While set, all transfer-class operations are
    /// rejected; administrative operations remain available.
    #[pallet::storage]
    #[pallet::getter(fn is_paused)]
    pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

    /// Minimum elapsed seconds between successive transfer-class debits from
    /// the same account. Zero disables rate limiting.
    #[pallet::storage]
    #[pallet::getter(fn cool_down_seconds)]
    pub type CoolDownSeconds<T> = StorageValue<_, u64, ValueQuery>;

    /// Upper bound on the amount of a single transfer-class operation.
    /// Always positive.
    #[pallet::storage]
    #[pallet::getter(fn max_transaction_amount)]
    pub type MaxTransactionAmount<T> = StorageValue<_, u128, ValueQuery>;

    /// Consumed authorization fingerprints. Entries are permanent: a signed
    /// instruction is single-use forever, not just until it expires.
    #[pallet::storage]
    #[pallet::getter(fn authorization_consumed)]
    pub type ConsumedAuthorizations<T> = StorageMap<_, Identity, [u8; 32], bool, ValueQuery>;

    /// Unix seconds of the most recent transfer-class debit per account,
    /// direct or offline. Overwritten on every qualifying debit.
    #[pallet::storage]
    #[pallet::getter(fn last_transaction_at)]
    pub type LastTransactionAt<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// New units issued
        Minted { to: T::AccountId, amount: u128 },
        /// Units destroyed
        Burned { from: T::AccountId, amount: u128 },
        /// Units moved from one account to another
        Transferred { from: T::AccountId, to: T::AccountId, amount: u128 },
        /// Spending allowance set
        Approved { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        /// Blacklist membership changed
        BlacklistStatusSet { account: T::AccountId, blacklisted: bool },
        /// Transfer-class operations suspended
        Paused,
        /// Transfer-class operations resumed
        Unpaused,
        /// Cool-down interval updated
        CoolDownSet { seconds: u64 },
        /// Per-transaction ceiling updated
        MaxTransactionAmountSet { amount: u128 },
        /// Role granted to an account
        RoleGranted { role: Role, account: T::AccountId },
        /// Role revoked from an account
        RoleRevoked { role: Role, account: T::AccountId },
        /// An externally signed transfer instruction was applied
        OfflineTransactionProcessed {
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            authorization: [u8; 32],
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller does not hold the role required for this operation
        Unauthorized,
        /// Transfer-class operations are suspended
        Paused,
        /// Sender or receiver is blacklisted
        Blacklisted,
        /// Cool-down interval since the account's last debit has not elapsed
        TooSoon,
        /// Amount exceeds the per-transaction ceiling
        AmountTooLarge,
        /// Account balance is lower than the requested debit
        InsufficientBalance,
        /// Spender allowance is lower than the requested amount
        InsufficientAllowance,
        /// Minting would push total supply past the ceiling
        SupplyCeilingExceeded,
        /// Rejected policy value
        InvalidPolicy,
        /// Instruction expiration time is in the past
        Expired,
        /// Signature does not recover to the stated sender
        InvalidSignature,
        /// Signature is not a well-formed recoverable signature
        MalformedSignature,
        /// Authorization fingerprint has already been consumed
        AlreadyUsed,
        /// Bulk instruction arrays differ in length
        ArrayLengthMismatch,
        /// Arithmetic overflow
        Overflow,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Issue `amount` new units to `to`. Requires the Minter role.
        ///
        /// Blacklisted accounts may still receive mints; the blacklist gates
        /// transfer-class operations only.
        #[pallet::call_index(0)]
        #[pallet::weight(10_000)]
        pub fn mint(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Minter)?;

            let new_supply = TotalSupply::<T>::get()
                .checked_add(amount)
                .ok_or(Error::<T>::Overflow)?;
            ensure!(new_supply <= T::MaxSupply::get(), Error::<T>::SupplyCeilingExceeded);
            let new_balance = Balances::<T>::get(&to)
                .checked_add(amount)
                .ok_or(Error::<T>::Overflow)?;

            Balances::<T>::insert(&to, new_balance);
            TotalSupply::<T>::put(new_supply);

            Self::deposit_event(Event::Minted { to, amount });
            Ok(())
        }

        /// Destroy `amount` units held by `from`. Requires the Burner role.
        #[pallet::call_index(1)]
        #[pallet::weight(10_000)]
        pub fn burn(origin: OriginFor<T>, from: T::AccountId, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Burner)?;

            let new_balance = Balances::<T>::get(&from)
                .checked_sub(amount)
                .ok_or(Error::<T>::InsufficientBalance)?;

            Balances::<T>::insert(&from, new_balance);
            TotalSupply::<T>::mutate(|supply| *supply = supply.saturating_sub(amount));

            Self::deposit_event(Event::Burned { from, amount });
            Ok(())
        }

        /// Move `amount` units from the caller to `to`.
        #[pallet::call_index(2)]
        #[pallet::weight(10_000)]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let from = ensure_signed(origin)?;
            Self::ensure_unpaused()?;
            Self::ensure_not_blacklisted(&from)?;
            Self::ensure_not_blacklisted(&to)?;

            let now = Self::now_seconds();
            Self::check_cool_down(&from, now)?;
            ensure!(amount <= MaxTransactionAmount::<T>::get(), Error::<T>::AmountTooLarge);

            Self::do_transfer(&from, &to, amount)?;
            LastTransactionAt::<T>::insert(&from, now);
            Ok(())
        }

        /// Move `amount` units from `from` to `to`, consuming the caller's
        /// allowance granted by `from`.
        #[pallet::call_index(3)]
        #[pallet::weight(10_000)]
        pub fn transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::ensure_unpaused()?;
            Self::ensure_not_blacklisted(&from)?;
            Self::ensure_not_blacklisted(&to)?;

            let now = Self::now_seconds();
            Self::check_cool_down(&from, now)?;
            ensure!(amount <= MaxTransactionAmount::<T>::get(), Error::<T>::AmountTooLarge);

            let allowance = Allowances::<T>::get(&from, &spender);
            let remaining = allowance
                .checked_sub(amount)
                .ok_or(Error::<T>::InsufficientAllowance)?;

            Self::do_transfer(&from, &to, amount)?;
            Allowances::<T>::insert(&from, &spender, remaining);
            LastTransactionAt::<T>::insert(&from, now);
            Ok(())
        }

        /// Set the caller's spending allowance for `spender`.
        #[pallet::call_index(4)]
        #[pallet::weight(10_000)]
        pub fn approve(
            origin: OriginFor<T>,
            spender: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Allowances::<T>::insert(&owner, &spender, amount);
            Self::deposit_event(Event::Approved { owner, spender, amount });
            Ok(())
        }

        /// Add `account` to or remove it from the blacklist. Requires Admin.
        #[pallet::call_index(5)]
        #[pallet::weight(10_000)]
        pub fn set_blacklist_status(
            origin: OriginFor<T>,
            account: T::AccountId,
            blacklisted: bool,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Admin)?;
            Blacklist::<T>::insert(&account, blacklisted);
            Self::deposit_event(Event::BlacklistStatusSet { account, blacklisted });
            Ok(())
        }

        /// Suspend all transfer-class operations. Requires Pauser.
        #[pallet::call_index(6)]
        #[pallet::weight(10_000)]
        pub fn pause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Pauser)?;
            Paused::<T>::put(true);
            Self::deposit_event(Event::Paused);
            Ok(())
        }

        /// Resume transfer-class operations. Requires Pauser.
        #[pallet::call_index(7)]
        #[pallet::weight(10_000)]
        pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Pauser)?;
            Paused::<T>::put(false);
            Self::deposit_event(Event::Unpaused);
            Ok(())
        }

        /// Set the cool-down interval. Zero disables rate limiting.
        /// Requires PolicySetter.
        #[pallet::call_index(8)]
        #[pallet::weight(10_000)]
        pub fn set_cool_down(origin: OriginFor<T>, seconds: u64) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::PolicySetter)?;
            CoolDownSeconds::<T>::put(seconds);
            Self::deposit_event(Event::CoolDownSet { seconds });
            Ok(())
        }

        /// Set the per-transaction ceiling. Must be positive.
        /// Requires PolicySetter.
        #[pallet::call_index(9)]
        #[pallet::weight(10_000)]
        pub fn set_max_transaction_amount(origin: OriginFor<T>, amount: u128) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::PolicySetter)?;
            ensure!(amount > 0, Error::<T>::InvalidPolicy);
            MaxTransactionAmount::<T>::put(amount);
            Self::deposit_event(Event::MaxTransactionAmountSet { amount });
            Ok(())
        }

        /// Grant `role` to `account`. Requires Admin. Granting an
        /// already-held role is a no-op, not an error.
        #[pallet::call_index(10)]
        #[pallet::weight(10_000)]
        pub fn grant_role(
            origin: OriginFor<T>,
            role: Role,
            account: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Admin)?;
            Roles::<T>::insert(role, &account, true);
            Self::deposit_event(Event::RoleGranted { role, account });
            Ok(())
        }

        /// Revoke `role` from `account`. Requires Admin. Revoking an unheld
        /// role is a no-op, not an error.
        #[pallet::call_index(11)]
        #[pallet::weight(10_000)]
        pub fn revoke_role(
            origin: OriginFor<T>,
            role: Role,
            account: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_role(&who, Role::Admin)?;
            Roles::<T>::remove(role, &account);
            Self::deposit_event(Event::RoleRevoked { role, account });
            Ok(())
        }

        /// Apply a transfer instruction authorized by `from`'s signature
        /// rather than by `from` calling in directly. Any signed caller may
        /// relay the instruction.
        ///
        /// The signed payload binds (from, to, amount, nonce, expires_at) and
        /// this ledger's instance identifier; see the `signature` module for
        /// the exact convention. A rejected instruction never consumes its
        /// authorization fingerprint.
        #[pallet::call_index(12)]
        #[pallet::weight(10_000)]
        pub fn process_offline_transaction(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            nonce: u64,
            expires_at: u64,
            signature: EcdsaSignature,
        ) -> DispatchResult {
            let _relayer = ensure_signed(origin)?;
            Self::ensure_unpaused()?;
            Self::do_process_offline(from, to, amount, nonce, expires_at, &signature)
        }

        /// Apply a batch of offline transfer instructions atomically, in
        /// array order. If any instruction fails any check, the whole call
        /// rejects and no instruction in the batch has any effect.
        #[pallet::call_index(13)]
        #[pallet::weight(10_000)]
        pub fn process_bulk_offline_transactions(
            origin: OriginFor<T>,
            froms: Vec<T::AccountId>,
            tos: Vec<T::AccountId>,
            amounts: Vec<u128>,
            nonces: Vec<u64>,
            expirations: Vec<u64>,
            signatures: Vec<EcdsaSignature>,
        ) -> DispatchResult {
            let _relayer = ensure_signed(origin)?;
            Self::ensure_unpaused()?;

            let len = froms.len();
            ensure!(
                tos.len() == len
                    && amounts.len() == len
                    && nonces.len() == len
                    && expirations.len() == len
                    && signatures.len() == len,
                Error::<T>::ArrayLengthMismatch
            );

            with_transaction(|| -> TransactionOutcome<DispatchResult> {
                for i in 0..len {
                    if let Err(e) = Self::do_process_offline(
                        froms[i].clone(),
                        tos[i].clone(),
                        amounts[i],
                        nonces[i],
                        expirations[i],
                        &signatures[i],
                    ) {
                        return TransactionOutcome::Rollback(Err(e));
                    }
                }
                TransactionOutcome::Commit(Ok(()))
            })
        }
    }

    #[pallet::genesis_config]
    pub struct GenesisConfig<T: Config> {
        /// Deployer identity, granted the Admin role at construction
        pub admin: Option<T::AccountId>,
        /// Initial cool-down interval in seconds
        pub cool_down_seconds: u64,
        /// Initial per-transaction ceiling; must be positive
        pub max_transaction_amount: u128,
        /// Initial credits (account, amount)
        pub initial_balances: Vec<(T::AccountId, u128)>,
    }

    impl<T: Config> Default for GenesisConfig<T> {
        fn default() -> Self {
            Self {
                admin: None,
                cool_down_seconds: 0,
                max_transaction_amount: u128::MAX,
                initial_balances: Vec::new(),
            }
        }
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            if let Some(ref admin) = self.admin {
                Roles::<T>::insert(Role::Admin, admin, true);
            }

            assert!(self.max_transaction_amount > 0, "Max transaction amount must be positive");
            MaxTransactionAmount::<T>::put(self.max_transaction_amount);
            CoolDownSeconds::<T>::put(self.cool_down_seconds);

            let mut total: u128 = 0;
            for (account, amount) in &self.initial_balances {
                Balances::<T>::insert(account, amount);
                total = total.checked_add(*amount).expect("Initial balances overflow");
            }
            assert!(total <= T::MaxSupply::get(), "Initial balances exceed the supply ceiling");
            TotalSupply::<T>::put(total);
        }
    }

    impl<T: Config> Pallet<T> {
        /// Deterministic fingerprint of a transfer instruction, domain
        /// separated by this ledger's instance identifier. Doubles as the
        /// signed payload and the replay key.
        pub fn instruction_fingerprint(
            from: &T::AccountId,
            to: &T::AccountId,
            amount: u128,
            nonce: u64,
            expires_at: u64,
        ) -> [u8; 32] {
            let payload = (T::LedgerId::get(), from, to, amount, nonce, expires_at).encode();
            sp_io::hashing::blake2_256(&payload)
        }

        fn now_seconds() -> u64 {
            T::TimeProvider::now().as_secs()
        }

        fn ensure_role(who: &T::AccountId, role: Role) -> DispatchResult {
            ensure!(Roles::<T>::get(role, who), Error::<T>::Unauthorized);
            Ok(())
        }

        fn ensure_unpaused() -> DispatchResult {
            ensure!(!Paused::<T>::get(), Error::<T>::Paused);
            Ok(())
        }

        fn ensure_not_blacklisted(account: &T::AccountId) -> DispatchResult {
            ensure!(!Blacklist::<T>::get(account), Error::<T>::Blacklisted);
            Ok(())
        }

        /// Passes iff `now >= last debit + cool-down`. A zero cool-down
        /// disables the check.
        fn check_cool_down(account: &T::AccountId, now: u64) -> DispatchResult {
            let cool_down = CoolDownSeconds::<T>::get();
            if cool_down == 0 {
                return Ok(());
            }
            let last = LastTransactionAt::<T>::get(account);
            ensure!(now >= last.saturating_add(cool_down), Error::<T>::TooSoon);
            Ok(())
        }

        /// The primitive debit/credit. Every higher-level transfer path runs
        /// its own checklist and then lands here; nothing bypasses it.
        /// Checks precede both writes, so a failure leaves no partial state.
        fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
            ensure!(Balances::<T>::get(from) >= amount, Error::<T>::InsufficientBalance);
            Balances::<T>::get(to)
                .checked_add(amount)
                .ok_or(Error::<T>::Overflow)?;

            // Sequential mutations keep self-transfers balanced.
            Balances::<T>::mutate(from, |bal| *bal -= amount);
            Balances::<T>::mutate(to, |bal| *bal += amount);

            Self::deposit_event(Event::Transferred {
                from: from.clone(),
                to: to.clone(),
                amount,
            });
            Ok(())
        }

        /// Validation pipeline for one offline instruction, in fixed order:
        /// expiration, signature, blacklist, replay, cool-down, ceiling, and
        /// finally the balance movement. The fingerprint is reserved only
        /// after the balance movement succeeds: a rejected instruction, even
        /// one that fails on balance, never consumes its fingerprint and may
        /// be resubmitted.
        fn do_process_offline(
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            nonce: u64,
            expires_at: u64,
            instruction_signature: &EcdsaSignature,
        ) -> DispatchResult {
            let now = Self::now_seconds();
            ensure!(now <= expires_at, Error::<T>::Expired);

            let fingerprint = Self::instruction_fingerprint(&from, &to, amount, nonce, expires_at);
            let digest = signature::signing_digest(&fingerprint);
            let signer = T::SignerRecovery::recover_signer(&digest, instruction_signature)
                .map_err(|e| match e {
                    RecoveryError::Malformed => Error::<T>::MalformedSignature,
                    RecoveryError::Unrecoverable => Error::<T>::InvalidSignature,
                })?;
            ensure!(signer == from, Error::<T>::InvalidSignature);

            Self::ensure_not_blacklisted(&from)?;
            Self::ensure_not_blacklisted(&to)?;

            ensure!(
                !ConsumedAuthorizations::<T>::get(fingerprint),
                Error::<T>::AlreadyUsed
            );

            Self::check_cool_down(&from, now)?;
            ensure!(amount <= MaxTransactionAmount::<T>::get(), Error::<T>::AmountTooLarge);

            Self::do_transfer(&from, &to, amount)?;
            ConsumedAuthorizations::<T>::insert(fingerprint, true);
            LastTransactionAt::<T>::insert(&from, now);

            Self::deposit_event(Event::OfflineTransactionProcessed {
                from,
                to,
                amount,
                authorization: fingerprint,
            });
            Ok(())
        }
    }
}

//! Benchmarking setup for pallet-opal-ledger
//!
//! Offline-transaction paths are excluded: they need out-of-band key material
//! and keep hand-assigned weights.

use super::*;

#[allow(unused)]
use crate::Pallet as OpalLedger;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn mint() {
        let minter: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Minter, &minter, true);
        let recipient: T::AccountId = account("recipient", 0, 0);
        let amount: u128 = 1_000_000;

        #[extrinsic_call]
        _(RawOrigin::Signed(minter), recipient.clone(), amount);

        assert_eq!(Balances::<T>::get(&recipient), amount);
    }

    #[benchmark]
    fn burn() {
        let burner: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Burner, &burner, true);
        let holder: T::AccountId = account("holder", 0, 0);
        Balances::<T>::insert(&holder, 10_000_000);
        TotalSupply::<T>::put(10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(burner), holder.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&holder), 9_000_000);
    }

    #[benchmark]
    fn transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        Balances::<T>::insert(&caller, 10_000_000);
        MaxTransactionAmount::<T>::put(10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000_000);
    }

    #[benchmark]
    fn transfer_from() {
        let spender: T::AccountId = whitelisted_caller();
        let owner: T::AccountId = account("owner", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        Balances::<T>::insert(&owner, 10_000_000);
        Allowances::<T>::insert(&owner, &spender, 5_000_000);
        MaxTransactionAmount::<T>::put(10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender.clone()), owner.clone(), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000_000);
        assert_eq!(Allowances::<T>::get(&owner, &spender), 4_000_000);
    }

    #[benchmark]
    fn approve() {
        let owner: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner.clone()), spender.clone(), 1_000_000);

        assert_eq!(Allowances::<T>::get(&owner, &spender), 1_000_000);
    }

    #[benchmark]
    fn set_blacklist_status() {
        let admin: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Admin, &admin, true);
        let target: T::AccountId = account("target", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(admin), target.clone(), true);

        assert_eq!(Blacklist::<T>::get(&target), true);
    }

    #[benchmark]
    fn pause() {
        let pauser: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Pauser, &pauser, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(pauser));

        assert_eq!(Paused::<T>::get(), true);
    }

    #[benchmark]
    fn unpause() {
        let pauser: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Pauser, &pauser, true);
        Paused::<T>::put(true);

        #[extrinsic_call]
        _(RawOrigin::Signed(pauser));

        assert_eq!(Paused::<T>::get(), false);
    }

    #[benchmark]
    fn set_cool_down() {
        let setter: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::PolicySetter, &setter, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(setter), 3_600);

        assert_eq!(CoolDownSeconds::<T>::get(), 3_600);
    }

    #[benchmark]
    fn set_max_transaction_amount() {
        let setter: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::PolicySetter, &setter, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(setter), 500_000);

        assert_eq!(MaxTransactionAmount::<T>::get(), 500_000);
    }

    #[benchmark]
    fn grant_role() {
        let admin: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Admin, &admin, true);
        let target: T::AccountId = account("target", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(admin), Role::Minter, target.clone());

        assert_eq!(Roles::<T>::get(Role::Minter, &target), true);
    }

    #[benchmark]
    fn revoke_role() {
        let admin: T::AccountId = whitelisted_caller();
        Roles::<T>::insert(Role::Admin, &admin, true);
        let target: T::AccountId = account("target", 0, 0);
        Roles::<T>::insert(Role::Minter, &target, true);

        #[extrinsic_call]
        _(RawOrigin::Signed(admin), Role::Minter, target.clone());

        assert_eq!(Roles::<T>::get(Role::Minter, &target), false);
    }

    impl_benchmark_test_suite!(OpalLedger, crate::mock::new_test_ext(), crate::mock::Test);
}

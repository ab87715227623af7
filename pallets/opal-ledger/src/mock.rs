use crate as pallet_opal_ledger;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    AccountId32, BuildStorage,
};

pub type AccountId = AccountId32;

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Timestamp: pallet_timestamp,
        OpalLedger: pallet_opal_ledger,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = AccountId;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<5>;
    type WeightInfo = ();
}

parameter_types! {
    pub const MaxSupply: u128 = 1_000_000_000;
    pub const LedgerId: [u8; 8] = *b"opal/lgr";
}

impl pallet_opal_ledger::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type TimeProvider = Timestamp;
    type SignerRecovery = pallet_opal_ledger::signature::EcdsaRecovery<AccountId>;
    type MaxSupply = MaxSupply;
    type LedgerId = LedgerId;
}

/// Deterministic account for test fixtures. The genesis admin is `account(1)`.
pub fn account(n: u8) -> AccountId {
    AccountId32::new([n; 32])
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_opal_ledger::GenesisConfig::<Test> {
        admin: Some(account(1)),
        cool_down_seconds: 0,
        max_transaction_amount: 1_000_000_000,
        initial_balances: vec![(account(2), 1_000_000), (account(3), 500_000)],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    t.into()
}

/*!
# Zabmon DevKit - Stubs et utilitaires de test

Bibliothèque de support pour tester le pipeline sans serveur Zabbix réel:
- Stub JSON-RPC sur socket TCP (réponses scriptées par méthode)
- Builders de payloads problem/trigger
*/

pub mod builders;
pub mod rpc_stub;

pub use rpc_stub::{MockZabbixServer, ResponseScript, ScriptedResponse};
